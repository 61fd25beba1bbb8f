//! HTML table discovery.
//!
//! Discovery runs in two passes. The generic pass reads every `<table>` that has a
//! header row and at least one `<td>` data row. Only when that finds nothing does the
//! structural pass run: it walks `<table>` elements and ARIA table/grid containers and
//! keeps those whose header cells mention every required header token.

use scraper::{ElementRef, Html, Selector};

use super::table::DataTable;
use crate::error::{RostrumError, Result};

/// Upper bound on a single cell's `colspan`.
const MAX_COLSPAN: usize = 64;

/// Upper bound on a single cell's `rowspan`.
const MAX_ROWSPAN: usize = 1024;

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Header tokens the structural pass requires (matched ignoring ASCII case).
    pub required_headers: Vec<String>,
    /// Maximum data rows to read per table (None = all).
    pub max_rows: Option<usize>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            required_headers: vec!["Name".to_string(), "Team".to_string()],
            max_rows: None,
        }
    }
}

/// Discovers candidate tables in raw HTML.
pub struct Parser {
    config: ParserConfig,
}

/// One parsed row: whether it is made only of header cells, and its cell texts.
struct RawRow {
    all_header: bool,
    has_data_cell: bool,
    cells: Vec<String>,
}

impl RawRow {
    /// A banner or caption: every cell carries the same text.
    fn is_caption(&self) -> bool {
        self.cells.iter().all(|c| *c == self.cells[0])
    }
}

/// Last index of the run of header rows starting at `first`.
fn header_run_end(rows: &[RawRow], first: usize) -> usize {
    let mut idx = first;
    while rows.get(idx + 1).is_some_and(|r| r.all_header) {
        idx += 1;
    }
    idx
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse raw page bytes into candidate tables, in document order.
    pub fn discover(&self, bytes: &[u8]) -> Result<Vec<DataTable>> {
        let html = String::from_utf8_lossy(bytes);
        let document = Html::parse_document(&html);

        let mut tables = self.generic_tables(&document)?;
        if tables.is_empty() {
            log::debug!("generic table parse found nothing, trying structural search");
            tables = self.structural_tables(&document)?;
        }

        if tables.is_empty() {
            return Err(RostrumError::NoTableFound);
        }

        log::debug!("discovered {} candidate table(s)", tables.len());
        Ok(tables)
    }

    /// Permissive pass over every `<table>` element.
    fn generic_tables(&self, document: &Html) -> Result<Vec<DataTable>> {
        let table_sel = css("table")?;
        let mut out = Vec::new();

        for table in document.select(&table_sel) {
            let rows = table_rows(table)?;
            if rows.is_empty() {
                continue;
            }

            // Only caption rows may sit above the header run.
            let header_idx = rows
                .iter()
                .position(|r| r.all_header)
                .filter(|&first| rows[..first].iter().all(RawRow::is_caption))
                .map(|first| header_run_end(&rows, first));

            let (headers, body) = match header_idx {
                Some(idx) => (rows[idx].cells.clone(), &rows[idx + 1..]),
                None => (generated_headers(&rows), &rows[..]),
            };

            let data: Vec<Vec<String>> = body
                .iter()
                .filter(|r| r.has_data_cell)
                .map(|r| r.cells.clone())
                .collect();

            if let Some(table) = self.build(headers, data) {
                out.push(table);
            }
        }

        Ok(out)
    }

    /// Tolerant pass: keep table-like elements whose header cells name every required token.
    fn structural_tables(&self, document: &Html) -> Result<Vec<DataTable>> {
        let container_sel = css("table, [role=\"table\"], [role=\"grid\"]")?;
        let th_sel = css("th")?;
        let column_header_sel = css("[role=\"columnheader\"]")?;

        let mut out = Vec::new();

        for container in document.select(&container_sel) {
            let is_table = container.value().name() == "table";
            let header_texts: Vec<String> = if is_table {
                container.select(&th_sel).map(cell_text).collect()
            } else {
                container.select(&column_header_sel).map(cell_text).collect()
            };

            if !self.has_required_headers(&header_texts) {
                continue;
            }

            let rows = if is_table {
                table_rows(container)?
            } else {
                aria_rows(container)?
            };

            // Data rows here may be all <th>, so the first header row is the header.
            let Some(header_idx) = rows.iter().position(|r| r.all_header) else {
                continue;
            };
            let headers = rows[header_idx].cells.clone();
            let data: Vec<Vec<String>> = rows[header_idx + 1..]
                .iter()
                .map(|r| r.cells.clone())
                .collect();

            if let Some(table) = self.build(headers, data) {
                out.push(table);
            }
        }

        Ok(out)
    }

    fn has_required_headers(&self, header_texts: &[String]) -> bool {
        !header_texts.is_empty()
            && self.config.required_headers.iter().all(|required| {
                header_texts
                    .iter()
                    .any(|h| h.trim().eq_ignore_ascii_case(required.trim()))
            })
    }

    fn build(&self, headers: Vec<String>, mut data: Vec<Vec<String>>) -> Option<DataTable> {
        if headers.is_empty() || data.is_empty() {
            return None;
        }
        if let Some(max) = self.config.max_rows {
            data.truncate(max);
        }
        Some(DataTable::new(headers, data))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

fn css(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| RostrumError::Config(format!("Invalid selector '{}': {}", selector, e)))
}

/// Visible text of a cell with whitespace collapsed.
fn cell_text(cell: ElementRef<'_>) -> String {
    let raw: String = cell.text().collect::<Vec<_>>().join(" ");
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn span(cell: ElementRef<'_>, attr: &str, max: usize) -> usize {
    cell.value()
        .attr(attr)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(1)
        .clamp(1, max)
}

fn colspan(cell: ElementRef<'_>) -> usize {
    span(cell, "colspan", MAX_COLSPAN)
}

fn rowspan(cell: ElementRef<'_>) -> usize {
    span(cell, "rowspan", MAX_ROWSPAN)
}

/// Cells carried down from earlier rows by `rowspan`, keyed by column.
#[derive(Default)]
struct RowSpans {
    carried: Vec<Option<(String, usize)>>,
}

impl RowSpans {
    /// Push carried cells into `cells` while the next column is covered by a span.
    fn fill(&mut self, cells: &mut Vec<String>) {
        while let Some(Some((text, remaining))) = self.carried.get_mut(cells.len()) {
            cells.push(text.clone());
            *remaining -= 1;
            if *remaining == 0 {
                self.carried[cells.len() - 1] = None;
            }
        }
    }

    /// Carry `text` at `column` into the next `rows` rows.
    fn open(&mut self, column: usize, text: &str, rows: usize) {
        if rows == 0 {
            return;
        }
        if self.carried.len() <= column {
            self.carried.resize(column + 1, None);
        }
        self.carried[column] = Some((text.to_string(), rows));
    }
}

/// True if the nearest enclosing `<table>` of `node` is `table`.
fn owned_by(node: ElementRef<'_>, table: ElementRef<'_>) -> bool {
    node.ancestors()
        .find(|n| n.value().as_element().is_some_and(|e| e.name() == "table"))
        .is_some_and(|n| n.id() == table.id())
}

/// Rows of a `<table>`, excluding rows of nested tables.
fn table_rows(table: ElementRef<'_>) -> Result<Vec<RawRow>> {
    let tr_sel = css("tr")?;
    let mut rows = Vec::new();
    let mut spans = RowSpans::default();

    for tr in table.select(&tr_sel).filter(|tr| owned_by(*tr, table)) {
        let in_thead = tr
            .parent()
            .and_then(|p| p.value().as_element().map(|e| e.name() == "thead"))
            .unwrap_or(false);

        let mut cells = Vec::new();
        let mut all_header = true;
        let mut has_data_cell = false;
        let mut own_cells = 0;

        for cell in tr.children().filter_map(ElementRef::wrap) {
            let name = cell.value().name();
            if name != "td" && name != "th" {
                continue;
            }
            if name == "td" {
                all_header = false;
                has_data_cell = true;
            }
            own_cells += 1;
            spans.fill(&mut cells);
            let text = cell_text(cell);
            let down = rowspan(cell) - 1;
            for _ in 0..colspan(cell) {
                spans.open(cells.len(), &text, down);
                cells.push(text.clone());
            }
        }
        spans.fill(&mut cells);

        if cells.is_empty() {
            continue;
        }
        // A row made only of carried cells is data.
        if own_cells == 0 {
            all_header = false;
            has_data_cell = true;
        }
        rows.push(RawRow {
            all_header: all_header || in_thead,
            has_data_cell: has_data_cell && !in_thead,
            cells,
        });
    }

    Ok(rows)
}

/// Rows of an ARIA `role="table"`/`role="grid"` container.
fn aria_rows(container: ElementRef<'_>) -> Result<Vec<RawRow>> {
    let row_sel = css("[role=\"row\"]")?;
    let cell_sel = css(
        "[role=\"columnheader\"], [role=\"rowheader\"], [role=\"cell\"], [role=\"gridcell\"]",
    )?;

    let mut rows = Vec::new();
    for row in container.select(&row_sel) {
        let mut cells = Vec::new();
        let mut all_header = true;
        for cell in row.select(&cell_sel) {
            if cell.value().attr("role") != Some("columnheader") {
                all_header = false;
            }
            let text = cell_text(cell);
            for _ in 0..colspan(cell) {
                cells.push(text.clone());
            }
        }
        if cells.is_empty() {
            continue;
        }
        rows.push(RawRow {
            all_header,
            has_data_cell: !all_header,
            cells,
        });
    }

    Ok(rows)
}

/// `column_1..column_n` for tables without a header row.
fn generated_headers(rows: &[RawRow]) -> Vec<String> {
    let width = rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
    (0..width).map(|i| format!("column_{}", i + 1)).collect()
}
