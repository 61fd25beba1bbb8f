//! Header repair, synonym renaming, and candidate selection.

mod normalizer;
mod selector;

pub use normalizer::{Normalizer, NormalizerConfig};
pub use selector::{ScoredTable, TableSelector};
