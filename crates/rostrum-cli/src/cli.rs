//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use rostrum::output::SecondaryFormat;
use std::path::PathBuf;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG: &str = "rostrum.toml";

/// Rostrum: player roster extraction from per-letter index pages
#[derive(Parser)]
#[command(name = "rostrum")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ./rostrum.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract every letter page and export the combined dataset
    Run {
        /// Letter keys to process, in order (default: from config)
        #[arg(value_name = "LETTER")]
        letters: Vec<String>,

        /// Directory holding cached letter pages
        #[arg(long)]
        local_dir: Option<PathBuf>,

        /// Remote page URL containing {L}
        #[arg(long)]
        base_url: Option<String>,

        /// Never fetch remotely
        #[arg(long)]
        offline: bool,

        /// Store fetched pages in the local directory
        #[arg(long)]
        cache: bool,

        /// Primary CSV output path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Secondary output path
        #[arg(long, conflicts_with = "no_secondary")]
        secondary: Option<PathBuf>,

        /// Secondary output format
        #[arg(long)]
        secondary_format: Option<SecondaryFormat>,

        /// Skip the secondary output
        #[arg(long)]
        no_secondary: bool,

        /// Write a JSON run summary to this path
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Show the candidate tables of one page and what cleaning kept
    Inspect {
        /// Path to an HTML page
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of kept rows to print
        #[arg(short = 'n', long, default_value = "10")]
        rows: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a config file with every default filled in
    Init {
        /// Where to write the config
        #[arg(value_name = "PATH", default_value = DEFAULT_CONFIG)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
