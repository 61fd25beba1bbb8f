//! Cell values carried by cleaned tables.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single value in a cleaned player table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Trimmed text.
    Text(String),
    /// A value coerced to a number (ages).
    Number(f64),
    /// No value; rendered with the configured missing marker.
    Missing,
}

impl Cell {
    /// Build a text cell, mapping blank text to `Missing`.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Cell::Missing
        } else {
            Cell::Text(value)
        }
    }

    /// Returns true if this cell holds no value.
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Borrow the text of a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Render the cell for export, using `missing` for absent values.
    pub fn render(&self, missing: &str) -> String {
        match self {
            Cell::Missing => missing.to_string(),
            other => other.to_string(),
        }
    }

    /// Parse text as a number; anything non-numeric becomes `Missing`.
    pub fn coerce_number(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Cell::Number(n),
            _ => Cell::Missing,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Missing => Ok(()),
        }
    }
}
