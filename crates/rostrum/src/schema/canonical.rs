//! The fixed player schema and header synonyms.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Column holding "Last, First" player names.
pub const NAME_COLUMN: &str = "Name";
/// Column holding position codes.
pub const POS_COLUMN: &str = "Pos";
/// Column holding the player's team.
pub const TEAM_COLUMN: &str = "Team";
/// Column coerced to numeric during cleaning.
pub const AGE_COLUMN: &str = "Age";

/// Output columns, in output order.
pub const DEFAULT_COLUMNS: &[&str] = &[
    "Name",
    "Pos",
    "Team",
    "Age",
    "DOB",
    "POB",
    "Nationality",
    "Bats",
    "Throws",
    "Height",
    "Weight",
    "Salary",
];

/// Ordered set of canonical column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalSchema {
    columns: Vec<String>,
}

impl CanonicalSchema {
    /// Create a schema from column names, dropping repeats.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for column in columns {
            let column = column.into();
            if !out.contains(&column) {
                out.push(column);
            }
        }
        Self { columns: out }
    }

    /// Column names in canonical order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of canonical columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Whether `name` is a canonical column (exact match).
    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Canonical position of `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Count how many of `headers` are canonical column names.
    pub fn score<S: AsRef<str>>(&self, headers: &[S]) -> usize {
        headers
            .iter()
            .filter(|h| self.contains(h.as_ref().trim()))
            .count()
    }
}

impl Default for CanonicalSchema {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMNS.iter().copied())
    }
}

/// Alternate header spellings mapped to canonical names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderSynonyms {
    map: IndexMap<String, String>,
}

impl HeaderSynonyms {
    /// Create a synonym map from `(alias, canonical)` pairs.
    pub fn new<I, A, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, C)>,
        A: Into<String>,
        C: Into<String>,
    {
        Self {
            map: pairs
                .into_iter()
                .map(|(a, c)| (a.into(), c.into()))
                .collect(),
        }
    }

    /// Canonical name for an alias, matched case-insensitively.
    pub fn canonical_for(&self, header: &str) -> Option<&str> {
        let header = header.trim();
        self.map
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(header))
            .map(|(_, canonical)| canonical.as_str())
    }

    /// Iterate over `(alias, canonical)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(a, c)| (a.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for HeaderSynonyms {
    fn default() -> Self {
        Self::new([
            ("Date of Birth", "DOB"),
            ("Birth Date", "DOB"),
            ("Birthdate", "DOB"),
            ("Place of Birth", "POB"),
            ("Birthplace", "POB"),
            ("Player", "Name"),
            ("Player Name", "Name"),
            ("Position", "Pos"),
            ("POS", "Pos"),
            ("Organization", "Team"),
            ("Org", "Team"),
            ("Club", "Team"),
            ("Nation", "Nationality"),
            ("Nat", "Nationality"),
            ("B", "Bats"),
            ("T", "Throws"),
            ("Ht", "Height"),
            ("Wt", "Weight"),
            ("Contract", "Salary"),
        ])
    }
}
