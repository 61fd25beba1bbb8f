//! Picks the candidate table that best matches the canonical schema.

use crate::error::{RostrumError, Result};
use crate::input::DataTable;
use crate::schema::CanonicalSchema;

/// The chosen candidate and how it scored.
#[derive(Debug, Clone)]
pub struct ScoredTable {
    /// Position of the table among the candidates.
    pub index: usize,
    /// Number of canonical columns the table carries.
    pub score: usize,
    pub table: DataTable,
}

/// Scores candidates by canonical column count.
pub struct TableSelector {
    schema: CanonicalSchema,
}

impl TableSelector {
    pub fn new(schema: CanonicalSchema) -> Self {
        Self { schema }
    }

    /// Score of a single candidate.
    pub fn score(&self, table: &DataTable) -> usize {
        self.schema.score(&table.headers)
    }

    /// Choose the highest-scoring candidate; the first one wins ties.
    pub fn select(&self, candidates: Vec<DataTable>) -> Result<ScoredTable> {
        let mut best: Option<ScoredTable> = None;

        for (index, table) in candidates.into_iter().enumerate() {
            let score = self.score(&table);
            let better = best.as_ref().is_none_or(|b| score > b.score);
            if better {
                best = Some(ScoredTable {
                    index,
                    score,
                    table,
                });
            }
        }

        best.ok_or_else(|| {
            RostrumError::AmbiguousOrEmptyInput("no candidate tables to select from".to_string())
        })
    }
}
