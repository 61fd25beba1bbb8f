//! Dataset export.

mod writer;

pub use writer::{DatasetWriter, ExportOutcome, LETTER_COLUMN, SecondaryFormat, export};
