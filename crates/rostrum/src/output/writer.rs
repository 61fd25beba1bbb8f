//! Writers for the aggregate dataset.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::aggregate::Dataset;
use crate::config::OutputConfig;
use crate::error::{Result, RostrumError};
use crate::schema::Cell;

/// Trailing column carrying each record's letter bucket.
pub const LETTER_COLUMN: &str = "Letter";

/// Format of the best-effort secondary output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecondaryFormat {
    /// Tab-separated text, opens directly in spreadsheet tools.
    #[default]
    Tsv,
    /// Array of row objects.
    Json,
}

impl std::str::FromStr for SecondaryFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tsv" => Ok(SecondaryFormat::Tsv),
            "json" => Ok(SecondaryFormat::Json),
            _ => Err(format!("Unknown format: {}. Use tsv or json.", s)),
        }
    }
}

impl std::fmt::Display for SecondaryFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecondaryFormat::Tsv => write!(f, "tsv"),
            SecondaryFormat::Json => write!(f, "json"),
        }
    }
}

/// Serializes a dataset; canonical columns first, then [`LETTER_COLUMN`].
pub struct DatasetWriter {
    missing_marker: String,
}

impl DatasetWriter {
    pub fn new(missing_marker: impl Into<String>) -> Self {
        Self {
            missing_marker: missing_marker.into(),
        }
    }

    /// Write delimited text with a header row.
    pub fn write_delimited<W: Write>(&self, dataset: &Dataset, writer: W, delimiter: u8) -> Result<()> {
        let mut out = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);

        let mut header: Vec<&str> = dataset.columns().iter().map(|c| c.as_str()).collect();
        header.push(LETTER_COLUMN);
        out.write_record(&header)?;

        for record in dataset.records() {
            let mut row: Vec<String> = record
                .cells
                .iter()
                .map(|c| c.render(&self.missing_marker))
                .collect();
            row.push(record.letter.clone());
            out.write_record(&row)?;
        }

        out.flush().map_err(|e| RostrumError::Export(format!("Failed to flush output: {}", e)))
    }

    /// Write a JSON array of objects keyed by column name; missing cells are `null`.
    pub fn write_json<W: Write>(&self, dataset: &Dataset, writer: W) -> Result<()> {
        let rows: Vec<IndexMap<&str, Value>> = dataset
            .records()
            .iter()
            .map(|record| {
                let mut row: IndexMap<&str, Value> = dataset
                    .columns()
                    .iter()
                    .zip(&record.cells)
                    .map(|(column, cell)| (column.as_str(), json_value(cell)))
                    .collect();
                row.insert(LETTER_COLUMN, Value::String(record.letter.clone()));
                row
            })
            .collect();

        serde_json::to_writer_pretty(writer, &rows)?;
        Ok(())
    }

    /// Write the primary CSV file.
    pub fn write_csv(&self, dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
        let file = create(path.as_ref())?;
        self.write_delimited(dataset, BufWriter::new(file), b',')
    }

    /// Write the secondary file in `format`.
    pub fn write_secondary(
        &self,
        dataset: &Dataset,
        path: impl AsRef<Path>,
        format: SecondaryFormat,
    ) -> Result<()> {
        let file = create(path.as_ref())?;
        let writer = BufWriter::new(file);
        match format {
            SecondaryFormat::Tsv => self.write_delimited(dataset, writer, b'\t'),
            SecondaryFormat::Json => self.write_json(dataset, writer),
        }
    }
}

fn json_value(cell: &Cell) -> Value {
    match cell {
        Cell::Text(s) => Value::String(s.clone()),
        Cell::Number(n) => serde_json::Number::from_f64(*n)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Cell::Missing => Value::Null,
    }
}

fn create(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| RostrumError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }
    File::create(path).map_err(|e| RostrumError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// What an export wrote.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub primary: PathBuf,
    /// Secondary file, when it was written.
    pub secondary: Option<PathBuf>,
    /// Why the secondary file could not be written.
    pub secondary_error: Option<String>,
}

/// Write the primary CSV (failure is an error) and the secondary file (failure is a warning).
pub fn export(dataset: &Dataset, output: &OutputConfig, missing_marker: &str) -> Result<ExportOutcome> {
    let writer = DatasetWriter::new(missing_marker);
    writer.write_csv(dataset, &output.csv_path)?;
    log::info!("wrote {} rows to {}", dataset.len(), output.csv_path.display());

    let mut outcome = ExportOutcome {
        primary: output.csv_path.clone(),
        secondary: None,
        secondary_error: None,
    };

    if let Some(ref path) = output.secondary_path {
        match writer.write_secondary(dataset, path, output.secondary_format) {
            Ok(()) => outcome.secondary = Some(path.clone()),
            Err(e) => {
                log::warn!("could not write {}: {}", path.display(), e);
                outcome.secondary_error = Some(e.to_string());
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::clean::CleanTable;
    use crate::schema::CanonicalSchema;
    use tempfile::TempDir;

    fn dataset() -> Dataset {
        let table = CleanTable {
            columns: vec!["Name".into(), "Team".into(), "Age".into()],
            rows: vec![vec![
                Cell::text("Smith, John"),
                Cell::text("Tigers"),
                Cell::Number(27.0),
            ]],
        };
        aggregate(CanonicalSchema::default(), vec![("S", table)])
    }

    #[test]
    fn test_csv_layout() {
        let mut buf = Vec::new();
        DatasetWriter::new("")
            .write_delimited(&dataset(), &mut buf, b',')
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "Name,Pos,Team,Age,DOB,POB,Nationality,Bats,Throws,Height,Weight,Salary,Letter"
        );
        assert_eq!(lines.next().unwrap(), "\"Smith, John\",,Tigers,27,,,,,,,,,s");
    }

    #[test]
    fn test_json_uses_null_for_missing() {
        let mut buf = Vec::new();
        DatasetWriter::new("").write_json(&dataset(), &mut buf).unwrap();
        let rows: Vec<serde_json::Value> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(rows[0]["Name"], "Smith, John");
        assert!(rows[0]["Pos"].is_null());
        assert_eq!(rows[0]["Age"], 27.0);
        assert_eq!(rows[0]["Letter"], "s");
    }

    #[test]
    fn test_secondary_failure_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        // A directory where the secondary file should go makes File::create fail.
        let blocked = dir.path().join("blocked");
        std::fs::create_dir(&blocked).unwrap();

        let output = OutputConfig {
            csv_path: dir.path().join("players.csv"),
            secondary_path: Some(blocked),
            secondary_format: SecondaryFormat::Tsv,
        };

        let outcome = export(&dataset(), &output, "").unwrap();
        assert!(outcome.primary.exists());
        assert!(outcome.secondary.is_none());
        assert!(outcome.secondary_error.is_some());
    }
}
