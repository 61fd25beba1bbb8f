//! Run command - extract every letter and export the dataset.

use std::path::PathBuf;

use colored::Colorize;
use rostrum::output::{SecondaryFormat, export};
use rostrum::{Pipeline, RostrumConfig};

/// Command-line settings layered over the loaded config.
#[derive(Debug, Default)]
pub struct Overrides {
    pub letters: Vec<String>,
    pub local_dir: Option<PathBuf>,
    pub base_url: Option<String>,
    pub offline: bool,
    pub cache: bool,
    pub output: Option<PathBuf>,
    pub secondary: Option<PathBuf>,
    pub secondary_format: Option<SecondaryFormat>,
    pub no_secondary: bool,
}

impl Overrides {
    fn apply(self, config: &mut RostrumConfig) {
        if !self.letters.is_empty() {
            config.letters = self.letters;
        }
        if let Some(dir) = self.local_dir {
            config.source.local_dir = dir;
        }
        if self.base_url.is_some() {
            config.source.base_url = self.base_url;
        }
        config.source.offline |= self.offline;
        config.source.cache_remote |= self.cache;
        if let Some(path) = self.output {
            config.output.csv_path = path;
        }
        if self.secondary.is_some() {
            config.output.secondary_path = self.secondary;
        }
        if let Some(format) = self.secondary_format {
            config.output.secondary_format = format;
        }
        if self.no_secondary {
            config.output.secondary_path = None;
        }
    }
}

pub fn run(
    config_path: Option<PathBuf>,
    overrides: Overrides,
    summary_path: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(config_path)?;
    overrides.apply(&mut config);
    config.validate()?;

    println!(
        "{} {} letters from {}",
        "Extracting".cyan().bold(),
        config.letters.len().to_string().white().bold(),
        config.source.local_dir.display().to_string().white()
    );
    if let Some(url) = config.remote_url() {
        if config.source.offline {
            println!("  Remote fetch disabled (offline)");
        } else {
            println!("  Falling back to {}", url.white());
        }
    }

    let pipeline = Pipeline::from_config(&config)?;
    let result = pipeline.run(&config.letters)?;

    if verbose {
        println!();
        println!("{}", "Letters:".yellow().bold());
        for letter in &result.summary.letters {
            println!(
                "  {:4} {:6} rows  {:3} dropped  table {}/{}  {}",
                letter.letter,
                letter.report.kept_rows,
                letter.report.dropped_total(),
                letter.selected + 1,
                letter.candidates,
                letter.page.source
            );
        }
        println!();
    }

    let outcome = export(&result.dataset, &config.output, &config.schema.missing_marker)?;

    println!(
        "Collected {} players",
        result.dataset.len().to_string().white().bold()
    );
    println!(
        "{} {}",
        "Saved to".green().bold(),
        outcome.primary.display().to_string().white()
    );
    if let Some(ref secondary) = outcome.secondary {
        println!(
            "{} {}",
            "Saved to".green().bold(),
            secondary.display().to_string().white()
        );
    }
    if let Some(ref err) = outcome.secondary_error {
        println!("{} {}", "Warning:".yellow().bold(), err);
    }

    if let Some(path) = summary_path {
        let json = serde_json::to_string_pretty(&result.summary)?;
        std::fs::write(&path, json)?;
        println!(
            "{} {}",
            "Summary written to".green(),
            path.display().to_string().white()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_config_values() {
        let mut config = RostrumConfig::default();
        Overrides {
            letters: vec!["q".into()],
            offline: true,
            secondary_format: Some(SecondaryFormat::Json),
            no_secondary: true,
            ..Default::default()
        }
        .apply(&mut config);

        assert_eq!(config.letters, vec!["q"]);
        assert!(config.source.offline);
        assert_eq!(config.output.secondary_format, SecondaryFormat::Json);
        assert!(config.output.secondary_path.is_none());
    }

    #[test]
    fn test_empty_overrides_keep_config() {
        let mut config = RostrumConfig::default();
        Overrides::default().apply(&mut config);
        assert_eq!(config.letters.len(), 26);
        assert!(config.output.secondary_path.is_some());
    }
}
