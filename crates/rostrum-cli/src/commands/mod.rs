//! CLI command implementations.

pub mod init;
pub mod inspect;
pub mod run;

use std::path::{Path, PathBuf};

use rostrum::RostrumConfig;

use crate::cli::DEFAULT_CONFIG;

/// Load the config named on the command line, else `./rostrum.toml`, else defaults.
pub fn load_config(path: Option<PathBuf>) -> Result<RostrumConfig, Box<dyn std::error::Error>> {
    match path {
        Some(p) => Ok(RostrumConfig::load(&p)?),
        None if Path::new(DEFAULT_CONFIG).is_file() => Ok(RostrumConfig::load(DEFAULT_CONFIG)?),
        None => {
            log::debug!("no {} found, using defaults", DEFAULT_CONFIG);
            Ok(RostrumConfig::default())
        }
    }
}
