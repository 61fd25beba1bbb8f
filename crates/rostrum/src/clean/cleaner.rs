//! Row cleaner: removes non-player rows, coerces types, and deduplicates.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::rules::{DropReason, RowRules};
use crate::input::DataTable;
use crate::schema::{AGE_COLUMN, CanonicalSchema, Cell, NAME_COLUMN, POS_COLUMN, TEAM_COLUMN};

/// A cleaned table: exactly the canonical columns, in canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl CleanTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Get a specific cell.
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Render back to a text table, with missing cells as empty strings.
    pub fn to_data_table(&self) -> DataTable {
        DataTable::new(
            self.columns.clone(),
            self.rows
                .iter()
                .map(|row| row.iter().map(|c| c.render("")).collect())
                .collect(),
        )
    }
}

/// Counts of what the cleaner did to one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanReport {
    /// Rows in the selected table.
    pub input_rows: usize,
    /// Rows that survived cleaning.
    pub kept_rows: usize,
    pub junk_pattern: usize,
    pub header_echo: usize,
    pub blank_name: usize,
    pub not_admitted: usize,
    pub missing_team: usize,
    pub duplicate: usize,
    /// Non-empty Age values that were not numeric.
    pub ages_coerced_to_missing: usize,
}

impl CleanReport {
    fn record(&mut self, reason: DropReason) {
        let slot = match reason {
            DropReason::JunkPattern => &mut self.junk_pattern,
            DropReason::HeaderEcho => &mut self.header_echo,
            DropReason::BlankName => &mut self.blank_name,
            DropReason::NotAdmitted => &mut self.not_admitted,
            DropReason::MissingTeam => &mut self.missing_team,
            DropReason::Duplicate => &mut self.duplicate,
        };
        *slot += 1;
    }

    /// Count for one drop reason.
    pub fn dropped(&self, reason: DropReason) -> usize {
        match reason {
            DropReason::JunkPattern => self.junk_pattern,
            DropReason::HeaderEcho => self.header_echo,
            DropReason::BlankName => self.blank_name,
            DropReason::NotAdmitted => self.not_admitted,
            DropReason::MissingTeam => self.missing_team,
            DropReason::Duplicate => self.duplicate,
        }
    }

    /// Total rows removed.
    pub fn dropped_total(&self) -> usize {
        self.input_rows - self.kept_rows
    }
}

/// Output of [`RowCleaner::clean`].
#[derive(Debug, Clone)]
pub struct CleanResult {
    pub table: CleanTable,
    pub report: CleanReport,
}

/// Keeps only genuine player rows of a normalized table.
pub struct RowCleaner {
    schema: CanonicalSchema,
    rules: RowRules,
}

impl RowCleaner {
    pub fn new(schema: CanonicalSchema, rules: RowRules) -> Self {
        Self { schema, rules }
    }

    /// Clean a normalized table.
    ///
    /// Rows are filtered, trimmed, type-coerced, and deduplicated on (Name, Team)
    /// keeping the first occurrence. Canonical columns absent from the input are
    /// added as missing, and columns come out in canonical order.
    pub fn clean(&self, table: DataTable) -> CleanResult {
        let mut report = CleanReport {
            input_rows: table.row_count(),
            ..CleanReport::default()
        };

        let name_idx = table.column_index(NAME_COLUMN);
        let pos_idx = table.column_index(POS_COLUMN);
        let team_idx = table.column_index(TEAM_COLUMN);
        let age_idx = table.column_index(AGE_COLUMN);

        // Source column for each canonical column.
        let sources: Vec<Option<usize>> = self
            .schema
            .columns()
            .iter()
            .map(|c| table.column_index(c))
            .collect();

        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut rows = Vec::new();

        for raw in table.rows {
            let cells: Vec<String> = raw.iter().map(|c| c.trim().to_string()).collect();
            let cell = |idx: Option<usize>| idx.and_then(|i| cells.get(i)).map(|s| s.as_str());

            let name = cell(name_idx).unwrap_or("");
            if let Some(reason) = self.rules.classify(name, cell(pos_idx), cell(team_idx)) {
                report.record(reason);
                continue;
            }

            let team = cell(team_idx);
            if team.is_some_and(str::is_empty) {
                report.record(DropReason::MissingTeam);
                continue;
            }

            let key = (name.to_string(), team.unwrap_or("").to_string());
            if seen.contains(&key) {
                report.record(DropReason::Duplicate);
                continue;
            }

            let mut row = Vec::with_capacity(sources.len());
            for source in &sources {
                let value = match source {
                    Some(i) => {
                        let text = cells.get(*i).map(|s| s.as_str()).unwrap_or("");
                        if Some(*i) == age_idx {
                            let coerced = Cell::coerce_number(text);
                            if coerced.is_missing() && !text.is_empty() {
                                report.ages_coerced_to_missing += 1;
                            }
                            coerced
                        } else {
                            Cell::text(text)
                        }
                    }
                    None => Cell::Missing,
                };
                row.push(value);
            }

            seen.insert(key);
            rows.push(row);
        }

        report.kept_rows = rows.len();
        log::debug!(
            "cleaned table: kept {} of {} rows",
            report.kept_rows,
            report.input_rows
        );

        CleanResult {
            table: CleanTable {
                columns: self.schema.columns().to_vec(),
                rows,
            },
            report,
        }
    }
}
