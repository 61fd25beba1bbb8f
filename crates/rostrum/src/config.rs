//! Run configuration, loaded from TOML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clean::{
    AdmissionPolicy, DEFAULT_JUNK_PATTERNS, DEFAULT_POSITION_CODES, JunkPatterns, PositionCodes,
    RowRules,
};
use crate::error::{Result, RostrumError};
use crate::input::{LETTER_PLACEHOLDER, LocalFileSource, RemoteSource, SourceChain};
use crate::normalize::NormalizerConfig;
use crate::output::SecondaryFormat;
use crate::schema::{CanonicalSchema, HeaderSynonyms, NAME_COLUMN};

/// Published letter pages, used when a page is missing locally.
pub const DEFAULT_BASE_URL: &str = "https://zapmast-oss.github.io/defending-the-shield-site/assets/site/current/leagues/league_200_players_{L}.html";

/// Where letter pages are read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Directory holding cached letter pages.
    pub local_dir: PathBuf,
    /// File name of a letter page; `{L}` is replaced by the letter.
    pub file_name_template: String,
    /// Remote page URL; `{L}` is replaced by the letter. No remote fetch when unset or blank.
    pub base_url: Option<String>,
    /// Remote fetch timeout in seconds.
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Store remotely fetched pages in `local_dir`.
    pub cache_remote: bool,
    /// Never fetch remotely.
    pub offline: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            local_dir: PathBuf::from("assets/site/current/leagues"),
            file_name_template: "league_200_players_{L}.html".to_string(),
            base_url: Some(DEFAULT_BASE_URL.to_string()),
            timeout_secs: 30,
            user_agent: concat!("rostrum/", env!("CARGO_PKG_VERSION")).to_string(),
            cache_remote: false,
            offline: false,
        }
    }
}

/// Output columns and how missing values are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub columns: CanonicalSchema,
    pub missing_marker: String,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            columns: CanonicalSchema::default(),
            missing_marker: String::new(),
        }
    }
}

/// Header repair settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    pub header_promotion_threshold: usize,
    pub synonyms: HeaderSynonyms,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            header_promotion_threshold: NormalizerConfig::default().header_promotion_threshold,
            synonyms: HeaderSynonyms::default(),
        }
    }
}

/// Row-validity settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    /// Regular expressions matched case-insensitively against the Name cell.
    pub junk_patterns: Vec<String>,
    pub position_codes: Vec<String>,
    pub admission: AdmissionPolicy,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            junk_patterns: DEFAULT_JUNK_PATTERNS.iter().map(|s| s.to_string()).collect(),
            position_codes: DEFAULT_POSITION_CODES.iter().map(|s| s.to_string()).collect(),
            admission: AdmissionPolicy::default(),
        }
    }
}

/// Export destinations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Primary delimited-text output.
    pub csv_path: PathBuf,
    /// Best-effort secondary output.
    pub secondary_path: Option<PathBuf>,
    pub secondary_format: SecondaryFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("players.csv"),
            secondary_path: Some(PathBuf::from("players.tsv")),
            secondary_format: SecondaryFormat::default(),
        }
    }
}

/// Complete configuration for a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RostrumConfig {
    /// Letter keys, in processing order.
    pub letters: Vec<String>,
    pub source: SourceConfig,
    pub schema: SchemaConfig,
    pub normalize: NormalizeConfig,
    pub clean: CleanConfig,
    pub output: OutputConfig,
}

impl Default for RostrumConfig {
    fn default() -> Self {
        Self {
            letters: ('a'..='z').map(|c| c.to_string()).collect(),
            source: SourceConfig::default(),
            schema: SchemaConfig::default(),
            normalize: NormalizeConfig::default(),
            clean: CleanConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl RostrumConfig {
    /// Load and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| RostrumError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::from_toml(&content)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| RostrumError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as TOML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| RostrumError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| RostrumError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Check settings that would make every run fail.
    pub fn validate(&self) -> Result<()> {
        if self.letters.iter().any(|l| l.trim().is_empty()) {
            return Err(RostrumError::Config("letter keys must not be blank".to_string()));
        }
        if !self.schema.columns.contains(NAME_COLUMN) {
            return Err(RostrumError::Config(format!(
                "schema columns must include '{}'",
                NAME_COLUMN
            )));
        }
        if !self.source.file_name_template.contains(LETTER_PLACEHOLDER) {
            return Err(RostrumError::Config(format!(
                "file_name_template must contain '{}'",
                LETTER_PLACEHOLDER
            )));
        }
        if let Some(url) = self.remote_url() {
            if !url.contains(LETTER_PLACEHOLDER) {
                return Err(RostrumError::Config(format!(
                    "base_url must contain '{}'",
                    LETTER_PLACEHOLDER
                )));
            }
        }
        if self.source.timeout_secs == 0 {
            return Err(RostrumError::Config("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    /// The configured remote URL, if it is set and not blank.
    pub fn remote_url(&self) -> Option<&str> {
        self.source
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    /// Row rules built from the clean section.
    pub fn row_rules(&self) -> Result<RowRules> {
        Ok(RowRules::new(
            JunkPatterns::new(&self.clean.junk_patterns)?,
            PositionCodes::new(&self.clean.position_codes),
            self.clean.admission,
        ))
    }

    pub fn normalizer_config(&self) -> NormalizerConfig {
        NormalizerConfig {
            header_promotion_threshold: self.normalize.header_promotion_threshold,
        }
    }

    /// Local source, then (unless offline) the remote source.
    pub fn source_chain(&self) -> Result<SourceChain> {
        let local = LocalFileSource::new(
            &self.source.local_dir,
            &self.source.file_name_template,
        );
        let mut chain = SourceChain::new().with(local.clone());

        if let Some(url) = self.remote_url() {
            if !self.source.offline {
                let mut remote = RemoteSource::new(
                    url,
                    Duration::from_secs(self.source.timeout_secs),
                    &self.source.user_agent,
                )?;
                if self.source.cache_remote {
                    remote = remote.with_cache(local);
                }
                chain = chain.with(remote);
            }
        }

        Ok(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RostrumConfig::default();
        config.validate().unwrap();
        assert_eq!(config.letters.len(), 26);
        assert_eq!(config.letters[0], "a");
        assert_eq!(config.source.timeout_secs, 30);
        assert_eq!(config.normalize.header_promotion_threshold, 5);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = RostrumConfig::from_toml(
            r#"
letters = ["b", "c"]

[source]
local_dir = "pages"
base_url = "https://example.test/players_{L}.html"

[clean]
admission = "comma_only"
"#,
        )
        .unwrap();

        assert_eq!(config.letters, vec!["b", "c"]);
        assert_eq!(config.source.local_dir, PathBuf::from("pages"));
        assert_eq!(config.source.file_name_template, "league_200_players_{L}.html");
        assert_eq!(config.clean.admission, AdmissionPolicy::CommaOnly);
        assert_eq!(config.schema.columns, CanonicalSchema::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = RostrumConfig::default();
        let text = config.to_toml().unwrap();
        let back = RostrumConfig::from_toml(&text).unwrap();
        assert_eq!(back.schema.columns, config.schema.columns);
        assert_eq!(back.normalize.synonyms, config.normalize.synonyms);
        assert_eq!(back.clean.junk_patterns, config.clean.junk_patterns);
    }

    #[test]
    fn test_rejects_template_without_placeholder() {
        let err = RostrumConfig::from_toml("[source]\nfile_name_template = \"players.html\"\n")
            .unwrap_err();
        assert!(matches!(err, RostrumError::Config(_)));
    }

    #[test]
    fn test_rejects_schema_without_name() {
        let err = RostrumConfig::from_toml("[schema]\ncolumns = [\"Team\"]\n").unwrap_err();
        assert!(matches!(err, RostrumError::Config(_)));
    }

    #[test]
    fn test_bad_junk_pattern_surfaces_as_regex_error() {
        let mut config = RostrumConfig::default();
        config.clean.junk_patterns.push("([".to_string());
        assert!(matches!(config.row_rules(), Err(RostrumError::Regex(_))));
    }

    #[test]
    fn test_default_chain_falls_back_to_remote() {
        let config = RostrumConfig::default();
        assert_eq!(config.source.base_url.as_deref(), Some(DEFAULT_BASE_URL));
        assert!(DEFAULT_BASE_URL.ends_with("league_200_players_{L}.html"));
        assert_eq!(config.source_chain().unwrap().len(), 2);
    }

    #[test]
    fn test_blank_base_url_is_local_only() {
        let config = RostrumConfig::from_toml("[source]\nbase_url = \"\"\n").unwrap();
        assert_eq!(config.source_chain().unwrap().len(), 1);

        let mut config = RostrumConfig::default();
        config.source.base_url = None;
        assert_eq!(config.source_chain().unwrap().len(), 1);
    }

    #[test]
    fn test_offline_chain_has_only_local_source() {
        let mut config = RostrumConfig::default();
        config.source.base_url = Some("https://example.test/{L}.html".to_string());
        assert_eq!(config.source_chain().unwrap().len(), 2);

        config.source.offline = true;
        assert_eq!(config.source_chain().unwrap().len(), 1);
    }
}
