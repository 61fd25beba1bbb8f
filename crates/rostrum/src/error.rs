//! Error types for the Rostrum library.

use std::path::PathBuf;
use thiserror::Error;

/// Why a remote page fetch failed.
#[derive(Debug, Error)]
pub enum FetchFailure {
    /// The server answered with a non-2xx status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// The request did not complete within the configured timeout.
    #[error("timed out after {0}s")]
    Timeout(u64),

    /// Connection, TLS, or body read failure.
    #[error("network error: {0}")]
    Network(String),
}

/// Main error type for Rostrum operations.
#[derive(Debug, Error)]
pub enum RostrumError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The local page cache has no file for this letter.
    #[error("No local page for letter '{letter}' at '{path}'")]
    NotFoundLocally { letter: String, path: PathBuf },

    /// A remote fetch failed.
    #[error("Remote fetch of '{url}' failed: {failure}")]
    RemoteFetch {
        url: String,
        #[source]
        failure: FetchFailure,
    },

    /// Every configured byte source failed for a letter.
    #[error("No source produced a page for letter '{letter}' (tried: {})", attempts.join("; "))]
    SourceUnavailable {
        letter: String,
        attempts: Vec<String>,
    },

    /// The page contains nothing that looks like a table.
    #[error("No tables found on page")]
    NoTableFound,

    /// The selector was given no candidate tables.
    #[error("Ambiguous or empty input: {0}")]
    AmbiguousOrEmptyInput(String),

    /// Processing of one letter failed; the run is aborted.
    #[error("Letter '{letter}': {source}")]
    Letter {
        letter: String,
        #[source]
        source: Box<RostrumError>,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Export failed.
    #[error("Export error: {0}")]
    Export(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl RostrumError {
    /// Attach the letter being processed to an error.
    pub fn for_letter(self, letter: impl Into<String>) -> Self {
        RostrumError::Letter {
            letter: letter.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for Rostrum operations.
pub type Result<T> = std::result::Result<T, RostrumError>;
