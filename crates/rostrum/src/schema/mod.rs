//! Canonical player schema and cell values.

mod canonical;
mod types;

pub use canonical::{
    CanonicalSchema, HeaderSynonyms, AGE_COLUMN, DEFAULT_COLUMNS, NAME_COLUMN, POS_COLUMN,
    TEAM_COLUMN,
};
pub use types::Cell;
