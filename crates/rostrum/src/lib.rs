//! Rostrum: player roster extraction from per-letter HTML index pages.
//!
//! Rostrum reads one page per letter key, finds the table that best matches a
//! canonical player schema, repairs its headers, drops navigation and junk rows,
//! and merges every letter into a single sorted dataset.
//!
//! # Core Principles
//!
//! - **Local first**: Cached pages are read before anything is fetched
//! - **Schema-driven**: Tables are scored and reduced against canonical columns
//! - **All or nothing**: A failing letter aborts the run
//!
//! # Example
//!
//! ```no_run
//! use rostrum::{Pipeline, RostrumConfig};
//!
//! let config = RostrumConfig::default();
//! let pipeline = Pipeline::from_config(&config).unwrap();
//! let result = pipeline.run(&config.letters).unwrap();
//!
//! println!("Players: {}", result.dataset.len());
//! rostrum::output::export(&result.dataset, &config.output, "").unwrap();
//! ```

pub mod aggregate;
pub mod clean;
pub mod config;
pub mod error;
pub mod input;
pub mod normalize;
pub mod output;
pub mod schema;

mod pipeline;

pub use crate::pipeline::{
    CandidateSummary, Extraction, LetterSummary, Pipeline, RunResult, RunSummary,
};
pub use aggregate::{Aggregator, Dataset, PlayerRecord, aggregate};
pub use clean::{CleanReport, CleanTable, DropReason, RowCleaner, RowRules};
pub use config::RostrumConfig;
pub use error::{FetchFailure, Result, RostrumError};
pub use input::{ByteSource, DataTable, Page, PageMetadata, Parser, SourceChain};
pub use normalize::{Normalizer, TableSelector};
pub use schema::{CanonicalSchema, Cell, HeaderSynonyms};
