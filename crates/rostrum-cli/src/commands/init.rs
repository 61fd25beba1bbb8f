//! Init command - write a default config file.

use std::path::PathBuf;

use colored::Colorize;
use rostrum::RostrumConfig;

pub fn run(path: PathBuf, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() && !force {
        return Err(format!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        )
        .into());
    }

    RostrumConfig::default().save(&path)?;

    println!(
        "{} {}",
        "Wrote".green().bold(),
        path.display().to_string().white()
    );
    println!(
        "Pages missing from {} are fetched from {}.",
        "local_dir".cyan(),
        "base_url".cyan()
    );
    println!(
        "Set {} or pass {} to stay local.",
        "base_url = \"\"".cyan(),
        "--offline".cyan()
    );

    Ok(())
}
