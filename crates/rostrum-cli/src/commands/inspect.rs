//! Inspect command - show how one page is discovered, selected, and cleaned.

use std::path::PathBuf;

use colored::Colorize;
use rostrum::{DropReason, Pipeline, SourceChain};

pub fn run(
    config_path: Option<PathBuf>,
    file: PathBuf,
    rows: usize,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let config = super::load_config(config_path)?;
    let bytes = std::fs::read(&file)?;

    // Pages come from the file given, not from the configured sources.
    let pipeline = Pipeline::with_source(&config, SourceChain::new())?;
    let extraction = pipeline.extract(&bytes)?;
    let table = &extraction.clean.table;
    let report = &extraction.clean.report;

    if json_output {
        let status = serde_json::json!({
            "file": file.display().to_string(),
            "candidates": extraction.candidates,
            "selected": extraction.selected,
            "report": report,
            "columns": table.columns,
            "rows": table.rows.iter().take(rows).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Inspecting".cyan().bold(),
        file.display().to_string().white()
    );
    println!();

    println!("{}", "Candidate tables:".yellow().bold());
    for candidate in &extraction.candidates {
        let marker = if candidate.index == extraction.selected {
            "*".green().bold()
        } else {
            " ".normal()
        };
        println!(
            " {} #{:<3} score {:2}  {:5} rows  [{}]",
            marker,
            candidate.index + 1,
            candidate.score,
            candidate.rows,
            candidate.columns.join(", ")
        );
        if verbose {
            println!("        raw: [{}]", candidate.raw_columns.join(", "));
        }
    }
    println!();

    println!("{}", "Cleaning:".yellow().bold());
    println!("  Input rows:    {}", report.input_rows.to_string().white());
    println!("  Kept:          {}", report.kept_rows.to_string().green());
    for reason in DropReason::ALL {
        let count = report.dropped(reason);
        if count > 0 {
            println!("  {:14} {}", format!("{}:", reason.label()), count.to_string().red());
        }
    }
    if report.ages_coerced_to_missing > 0 {
        println!(
            "  Unparseable ages: {}",
            report.ages_coerced_to_missing.to_string().yellow()
        );
    }
    println!();

    if table.row_count() > 0 && rows > 0 {
        println!("{}", "Rows:".yellow().bold());
        println!("  {}", table.columns.join(" | ").bold());
        for row in table.rows.iter().take(rows) {
            let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
            println!("  {}", cells.join(" | "));
        }
        if table.row_count() > rows {
            println!("  ... {} more", table.row_count() - rows);
        }
    } else {
        println!("{}", "No player rows survived cleaning.".yellow());
    }

    Ok(())
}
