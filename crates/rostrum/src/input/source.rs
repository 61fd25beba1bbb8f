//! Byte sources: where raw letter pages come from.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{FetchFailure, Result, RostrumError};

/// Placeholder replaced by the letter key in file names and URLs.
pub const LETTER_PLACEHOLDER: &str = "{L}";

/// Metadata about a fetched page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMetadata {
    /// Letter key as requested.
    pub letter: String,
    /// Which source produced the page ("local", "remote").
    pub source: String,
    /// File path or URL the bytes came from.
    pub origin: String,
    /// SHA-256 hash of the page bytes.
    pub hash: String,
    /// Page size in bytes.
    pub size_bytes: u64,
    /// When the page was read.
    pub fetched_at: DateTime<Utc>,
}

impl PageMetadata {
    fn new(letter: &str, source: &str, origin: String, bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let hash = format!("sha256:{:x}", hasher.finalize());

        Self {
            letter: letter.to_string(),
            source: source.to_string(),
            origin,
            hash,
            size_bytes: bytes.len() as u64,
            fetched_at: Utc::now(),
        }
    }
}

/// Raw page bytes plus where they came from.
#[derive(Debug, Clone)]
pub struct Page {
    pub bytes: Vec<u8>,
    pub metadata: PageMetadata,
}

/// Anything that can produce the raw page for a letter key.
pub trait ByteSource {
    /// Short name used in logs and error reports.
    fn name(&self) -> &str;

    /// Produce the page for `letter`.
    fn get(&self, letter: &str) -> Result<Page>;
}

fn expand(template: &str, letter: &str) -> String {
    template.replace(LETTER_PLACEHOLDER, letter)
}

/// Reads `<dir>/<file_name_template>` from disk.
#[derive(Debug, Clone)]
pub struct LocalFileSource {
    dir: PathBuf,
    file_name_template: String,
}

impl LocalFileSource {
    pub fn new(dir: impl Into<PathBuf>, file_name_template: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            file_name_template: file_name_template.into(),
        }
    }

    /// Path of the page for `letter`.
    pub fn path_for(&self, letter: &str) -> PathBuf {
        self.dir.join(expand(&self.file_name_template, letter))
    }

    /// Write a page into the directory, creating it if needed.
    pub fn store(&self, letter: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path_for(letter);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| RostrumError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        fs::write(&path, bytes).map_err(|e| RostrumError::Io {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }
}

impl ByteSource for LocalFileSource {
    fn name(&self) -> &str {
        "local"
    }

    fn get(&self, letter: &str) -> Result<Page> {
        let path = self.path_for(letter);
        if !path.is_file() {
            return Err(RostrumError::NotFoundLocally {
                letter: letter.to_string(),
                path,
            });
        }

        let bytes = fs::read(&path).map_err(|e| RostrumError::Io {
            path: path.clone(),
            source: e,
        })?;
        log::debug!("read {} bytes from {}", bytes.len(), path.display());

        let metadata = PageMetadata::new(letter, self.name(), path.display().to_string(), &bytes);
        Ok(Page { bytes, metadata })
    }
}

/// Fetches pages over HTTP with a bounded timeout.
pub struct RemoteSource {
    client: Client,
    url_template: String,
    timeout: Duration,
    cache: Option<LocalFileSource>,
}

impl RemoteSource {
    /// Create a remote source; `url_template` contains the `{L}` placeholder.
    pub fn new(
        url_template: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| RostrumError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url_template: url_template.into(),
            timeout,
            cache: None,
        })
    }

    /// Store every fetched page through `cache`.
    pub fn with_cache(mut self, cache: LocalFileSource) -> Self {
        self.cache = Some(cache);
        self
    }

    /// URL of the page for `letter`.
    pub fn url_for(&self, letter: &str) -> String {
        expand(&self.url_template, letter)
    }

    fn failure(&self, e: reqwest::Error) -> FetchFailure {
        if e.is_timeout() {
            FetchFailure::Timeout(self.timeout.as_secs())
        } else {
            FetchFailure::Network(e.to_string())
        }
    }
}

impl ByteSource for RemoteSource {
    fn name(&self) -> &str {
        "remote"
    }

    fn get(&self, letter: &str) -> Result<Page> {
        let url = self.url_for(letter);
        log::debug!("fetching {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| RostrumError::RemoteFetch {
                url: url.clone(),
                failure: self.failure(e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RostrumError::RemoteFetch {
                url,
                failure: FetchFailure::Status(status.as_u16()),
            });
        }

        let bytes = response
            .bytes()
            .map_err(|e| RostrumError::RemoteFetch {
                url: url.clone(),
                failure: self.failure(e),
            })?
            .to_vec();

        if let Some(ref cache) = self.cache {
            match cache.store(letter, &bytes) {
                Ok(path) => log::debug!("cached {} at {}", url, path.display()),
                Err(e) => log::warn!("could not cache {}: {}", url, e),
            }
        }

        let metadata = PageMetadata::new(letter, self.name(), url, &bytes);
        Ok(Page { bytes, metadata })
    }
}

/// Sources tried in order; the first success wins.
#[derive(Default)]
pub struct SourceChain {
    sources: Vec<Box<dyn ByteSource>>,
}

impl SourceChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source to the end of the chain.
    pub fn with(mut self, source: impl ByteSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl ByteSource for SourceChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn get(&self, letter: &str) -> Result<Page> {
        let mut attempts = Vec::new();

        for source in &self.sources {
            match source.get(letter) {
                Ok(page) => return Ok(page),
                Err(e) => {
                    log::debug!("{} source failed for '{}': {}", source.name(), letter, e);
                    attempts.push(format!("{}: {}", source.name(), e));
                }
            }
        }

        Err(RostrumError::SourceUnavailable {
            letter: letter.to_string(),
            attempts,
        })
    }
}
