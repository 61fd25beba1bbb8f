//! Combines per-letter tables into one sorted dataset.

use serde::{Deserialize, Serialize};

use crate::clean::CleanTable;
use crate::schema::{CanonicalSchema, Cell, NAME_COLUMN, TEAM_COLUMN};

/// One player row, tagged with the letter page it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Lowercased letter bucket.
    pub letter: String,
    /// Cells in canonical column order.
    pub cells: Vec<Cell>,
}

/// All player records of a run, in final order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<PlayerRecord>,
}

impl Dataset {
    /// Canonical column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get a cell by row and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.records.get(row).and_then(|r| r.cells.get(col))
    }
}

/// Accumulates cleaned tables in processing order.
pub struct Aggregator {
    schema: CanonicalSchema,
    letters: Vec<String>,
    records: Vec<PlayerRecord>,
}

impl Aggregator {
    pub fn new(schema: CanonicalSchema) -> Self {
        Self {
            schema,
            letters: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Append one letter's table. Columns are matched by name against the schema.
    pub fn push(&mut self, letter: &str, table: CleanTable) {
        let letter = letter.to_lowercase();
        if !self.letters.contains(&letter) {
            self.letters.push(letter.clone());
        }

        let sources: Vec<Option<usize>> = self
            .schema
            .columns()
            .iter()
            .map(|c| table.column_index(c))
            .collect();

        for row in table.rows {
            let cells = sources
                .iter()
                .map(|src| {
                    src.and_then(|i| row.get(i).cloned())
                        .unwrap_or(Cell::Missing)
                })
                .collect();
            self.records.push(PlayerRecord {
                letter: letter.clone(),
                cells,
            });
        }
    }

    /// Sort and seal the dataset.
    ///
    /// Rows are ordered by (letter in processing order, Name, Team); missing names and
    /// teams sort last, and equal keys keep their input order.
    pub fn finish(self) -> Dataset {
        let Aggregator {
            schema,
            letters,
            mut records,
        } = self;

        let name_idx = schema.position(NAME_COLUMN);
        let team_idx = schema.position(TEAM_COLUMN);

        records.sort_by_cached_key(|r| {
            let rank = letters
                .iter()
                .position(|l| *l == r.letter)
                .unwrap_or(usize::MAX);
            (rank, sort_value(r, name_idx), sort_value(r, team_idx))
        });

        Dataset {
            columns: schema.columns().to_vec(),
            records,
        }
    }
}

/// Sort key for one cell: present values first, then by text.
fn sort_value(record: &PlayerRecord, idx: Option<usize>) -> (bool, String) {
    match idx.and_then(|i| record.cells.get(i)) {
        Some(cell) if !cell.is_missing() => (false, cell.to_string()),
        _ => (true, String::new()),
    }
}

/// Aggregate `(letter, table)` pairs given in processing order.
pub fn aggregate<I, S>(schema: CanonicalSchema, tables: I) -> Dataset
where
    I: IntoIterator<Item = (S, CleanTable)>,
    S: AsRef<str>,
{
    let mut aggregator = Aggregator::new(schema);
    for (letter, table) in tables {
        aggregator.push(letter.as_ref(), table);
    }
    aggregator.finish()
}
