//! Rostrum CLI - player roster extraction.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use env_logger::Env;

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Commands::Run {
            letters,
            local_dir,
            base_url,
            offline,
            cache,
            output,
            secondary,
            secondary_format,
            no_secondary,
            summary,
        } => commands::run::run(
            cli.config,
            commands::run::Overrides {
                letters,
                local_dir,
                base_url,
                offline,
                cache,
                output,
                secondary,
                secondary_format,
                no_secondary,
            },
            summary,
            cli.verbose,
        ),

        Commands::Inspect { file, rows, json } => {
            commands::inspect::run(cli.config, file, rows, json, cli.verbose)
        }

        Commands::Init { path, force } => commands::init::run(path, force),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
