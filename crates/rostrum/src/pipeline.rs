//! Main Pipeline struct and public API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregator, Dataset};
use crate::clean::{CleanReport, CleanResult, RowCleaner};
use crate::config::RostrumConfig;
use crate::error::Result;
use crate::input::{ByteSource, Parser, ParserConfig, PageMetadata};
use crate::normalize::{Normalizer, TableSelector};
use crate::schema::CanonicalSchema;

/// How one discovered table looked before and after normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSummary {
    /// Position in document order.
    pub index: usize,
    /// Headers as parsed from the page.
    pub raw_columns: Vec<String>,
    /// Canonical columns after normalization.
    pub columns: Vec<String>,
    /// Data rows after normalization.
    pub rows: usize,
    pub score: usize,
}

/// Result of running discovery, normalization, selection, and cleaning on one page.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub candidates: Vec<CandidateSummary>,
    /// Index of the selected candidate.
    pub selected: usize,
    pub clean: CleanResult,
}

/// Per-letter entry of a run summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LetterSummary {
    pub letter: String,
    pub page: PageMetadata,
    pub candidates: usize,
    pub selected: usize,
    pub score: usize,
    pub report: CleanReport,
}

/// Summary of a whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub letters: Vec<LetterSummary>,
    pub total_rows: usize,
    pub completed_at: DateTime<Utc>,
}

/// Output of [`Pipeline::run`].
#[derive(Debug, Clone)]
pub struct RunResult {
    pub dataset: Dataset,
    pub summary: RunSummary,
}

/// The extraction pipeline: source → discovery → normalizer → selector → cleaner.
pub struct Pipeline {
    schema: CanonicalSchema,
    source: Box<dyn ByteSource>,
    parser: Parser,
    normalizer: Normalizer,
    selector: TableSelector,
    cleaner: RowCleaner,
}

impl Pipeline {
    /// Build a pipeline whose pages come from the config's source chain.
    pub fn from_config(config: &RostrumConfig) -> Result<Self> {
        let chain = config.source_chain()?;
        Self::with_source(config, chain)
    }

    /// Build a pipeline reading pages from `source`.
    pub fn with_source(config: &RostrumConfig, source: impl ByteSource + 'static) -> Result<Self> {
        config.validate()?;
        let schema = config.schema.columns.clone();

        Ok(Self {
            source: Box::new(source),
            parser: Parser::with_config(ParserConfig::default()),
            normalizer: Normalizer::with_config(
                schema.clone(),
                config.normalize.synonyms.clone(),
                config.normalizer_config(),
            ),
            selector: TableSelector::new(schema.clone()),
            cleaner: RowCleaner::new(schema.clone(), config.row_rules()?),
            schema,
        })
    }

    /// Extract the cleaned player table from raw page bytes.
    pub fn extract(&self, bytes: &[u8]) -> Result<Extraction> {
        let discovered = self.parser.discover(bytes)?;

        let mut candidates = Vec::with_capacity(discovered.len());
        let mut normalized = Vec::with_capacity(discovered.len());
        for (index, table) in discovered.into_iter().enumerate() {
            let raw_columns = table.headers.clone();
            let table = self.normalizer.normalize(table);
            candidates.push(CandidateSummary {
                index,
                raw_columns,
                columns: table.headers.clone(),
                rows: table.row_count(),
                score: self.selector.score(&table),
            });
            normalized.push(table);
        }

        let chosen = self.selector.select(normalized)?;
        log::debug!(
            "selected table {} of {} (score {})",
            chosen.index + 1,
            candidates.len(),
            chosen.score
        );

        Ok(Extraction {
            candidates,
            selected: chosen.index,
            clean: self.cleaner.clean(chosen.table),
        })
    }

    /// Fetch and extract one letter. Errors are tagged with the letter.
    pub fn process_letter(&self, letter: &str) -> Result<(PageMetadata, Extraction)> {
        let page = self.source.get(letter).map_err(|e| e.for_letter(letter))?;
        let extraction = self.extract(&page.bytes).map_err(|e| e.for_letter(letter))?;
        Ok((page.metadata, extraction))
    }

    /// Process letters in order and aggregate them.
    ///
    /// The first failing letter aborts the run; no partial dataset is returned.
    pub fn run<I, S>(&self, letters: I) -> Result<RunResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut aggregator = Aggregator::new(self.schema.clone());
        let mut summaries = Vec::new();

        for letter in letters {
            let letter = letter.as_ref();
            let (page, extraction) = self.process_letter(letter)?;

            let selected = extraction.selected;
            let score = extraction
                .candidates
                .get(selected)
                .map(|c| c.score)
                .unwrap_or(0);
            let CleanResult { table, report } = extraction.clean;

            log::info!(
                "[{}] {} rows from {} ({} candidate tables, {} rows dropped)",
                letter,
                report.kept_rows,
                page.origin,
                extraction.candidates.len(),
                report.dropped_total()
            );

            aggregator.push(letter, table);
            summaries.push(LetterSummary {
                letter: letter.to_string(),
                page,
                candidates: extraction.candidates.len(),
                selected,
                score,
                report,
            });
        }

        let dataset = aggregator.finish();
        let summary = RunSummary {
            letters: summaries,
            total_rows: dataset.len(),
            completed_at: Utc::now(),
        };

        Ok(RunResult { dataset, summary })
    }
}
