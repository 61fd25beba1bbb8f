//! Pipeline performance benchmarks.
//!
//! Measures discovery and cleaning across page sizes.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rostrum::clean::{RowCleaner, RowRules};
use rostrum::normalize::Normalizer;
use rostrum::{CanonicalSchema, HeaderSynonyms, Parser, Pipeline, RostrumConfig, SourceChain};

const POSITIONS: [&str; 6] = ["SS", "P", "CF", "1B", "C", "DH"];
const TEAMS: [&str; 4] = ["Hawks", "Tigers", "Owls", "Bears"];

/// Generate a letter page: a nav table, a letter index, and a player table.
fn generate_page(rows: usize) -> String {
    let mut html = String::from(
        "<html><body>\
         <table><tr><td><a href=\"/\">Home</a></td><td><a href=\"/teams\">Teams</a></td></tr></table>\
         <table><tr><td>A | B | C | D | E</td></tr></table>\
         <table><thead><tr><th>Player</th><th>Position</th><th>Club</th><th>Age</th>\
         <th>Birthplace</th><th>B</th><th>T</th></tr></thead><tbody>",
    );

    for row in 0..rows {
        // Every 20th row is chrome, every 25th a duplicate of the previous one.
        let idx = if row % 25 == 0 && row > 0 { row - 1 } else { row };
        if row % 20 == 0 {
            html.push_str("<tr><td>Players by Letter</td><td></td><td></td><td></td><td></td><td></td><td></td></tr>");
            continue;
        }
        html.push_str(&format!(
            "<tr><td>Player{:05}, First</td><td>{}</td><td>{}</td><td>{}</td><td>Town {}</td><td>R</td><td>L</td></tr>",
            idx,
            POSITIONS[idx % POSITIONS.len()],
            TEAMS[idx % TEAMS.len()],
            18 + idx % 20,
            idx % 50
        ));
    }

    html.push_str("</tbody></table></body></html>");
    html
}

/// Benchmark table discovery on pages of various sizes.
fn bench_discover(c: &mut Criterion) {
    let mut group = c.benchmark_group("discover");

    for rows in [100, 1_000, 10_000].iter() {
        let page = generate_page(*rows);

        group.throughput(Throughput::Bytes(page.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &page, |b, page| {
            let parser = Parser::new();
            b.iter(|| black_box(parser.discover(page.as_bytes()).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark normalization and cleaning of an already discovered table.
fn bench_clean(c: &mut Criterion) {
    let mut group = c.benchmark_group("clean");

    let schema = CanonicalSchema::default();
    let normalizer = Normalizer::new(schema.clone(), HeaderSynonyms::default());
    let cleaner = RowCleaner::new(schema, RowRules::defaults().unwrap());

    for rows in [100, 1_000, 10_000].iter() {
        let page = generate_page(*rows);
        let mut tables = Parser::new().discover(page.as_bytes()).unwrap();
        let table = normalizer.normalize(tables.remove(2));

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter_with_setup(|| table.clone(), |table| black_box(cleaner.clean(table)))
        });
    }

    group.finish();
}

/// Benchmark the whole per-page extraction.
fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");

    let pipeline = Pipeline::with_source(&RostrumConfig::default(), SourceChain::new()).unwrap();
    for rows in [100, 1_000, 10_000].iter() {
        let page = generate_page(*rows);

        group.throughput(Throughput::Bytes(page.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &page, |b, page| {
            b.iter(|| black_box(pipeline.extract(page.as_bytes()).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_discover, bench_clean, bench_extract);
criterion_main!(benches);
