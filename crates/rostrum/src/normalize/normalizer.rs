//! Schema normalization for candidate tables.

use crate::input::DataTable;
use crate::schema::{CanonicalSchema, HeaderSynonyms};

/// Normalizer configuration.
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    /// Canonical names the first data row must contain before it replaces the header.
    pub header_promotion_threshold: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            header_promotion_threshold: 5,
        }
    }
}

/// Repairs headers and reduces a candidate table to canonical columns.
pub struct Normalizer {
    schema: CanonicalSchema,
    synonyms: HeaderSynonyms,
    config: NormalizerConfig,
}

impl Normalizer {
    /// Create a normalizer with the default promotion threshold.
    pub fn new(schema: CanonicalSchema, synonyms: HeaderSynonyms) -> Self {
        Self::with_config(schema, synonyms, NormalizerConfig::default())
    }

    /// Create a normalizer with custom configuration.
    pub fn with_config(
        schema: CanonicalSchema,
        synonyms: HeaderSynonyms,
        config: NormalizerConfig,
    ) -> Self {
        Self {
            schema,
            synonyms,
            config,
        }
    }

    /// Normalize one candidate table.
    ///
    /// The result holds only canonical columns, in canonical order. It may hold none
    /// at all when the table is unrelated page chrome.
    pub fn normalize(&self, mut table: DataTable) -> DataTable {
        for header in &mut table.headers {
            *header = header.trim().to_string();
        }

        if self.promote_header_row(&mut table) {
            log::debug!("promoted first data row to header: {:?}", table.headers);
        }
        self.rename_synonyms(&mut table.headers);
        self.reduce(table)
    }

    /// Replace the header with the first data row when that row is a misplaced header.
    fn promote_header_row(&self, table: &mut DataTable) -> bool {
        let Some(first) = table.rows.first() else {
            return false;
        };

        let matches = self.schema.score(first);
        if matches < self.config.header_promotion_threshold.max(1) {
            return false;
        }

        let promoted = table.rows.remove(0);
        table.headers = promoted.iter().map(|c| c.trim().to_string()).collect();
        true
    }

    /// Rename aliases to canonical names unless the canonical name is already present.
    fn rename_synonyms(&self, headers: &mut [String]) {
        for i in 0..headers.len() {
            if self.schema.contains(&headers[i]) {
                continue;
            }
            let Some(canonical) = self.synonyms.canonical_for(&headers[i]) else {
                continue;
            };
            if headers.iter().any(|h| h == canonical) {
                continue;
            }
            headers[i] = canonical.to_string();
        }
    }

    /// Keep canonical columns only; the first occurrence of a repeated name wins.
    fn reduce(&self, table: DataTable) -> DataTable {
        let indices: Vec<(usize, &String)> = self
            .schema
            .columns()
            .iter()
            .filter_map(|c| table.column_index(c).map(|i| (i, c)))
            .collect();

        let headers = indices.iter().map(|(_, c)| (*c).clone()).collect();
        let rows = table
            .rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|(i, _)| row.get(*i).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        DataTable::new(headers, rows)
    }
}
