//! Row classification and cleanup of the selected table.

mod cleaner;
mod rules;

pub use cleaner::{CleanReport, CleanResult, CleanTable, RowCleaner};
pub use rules::{
    AdmissionPolicy, DropReason, JunkPatterns, PositionCodes, RowRules, DEFAULT_JUNK_PATTERNS,
    DEFAULT_POSITION_CODES,
};
