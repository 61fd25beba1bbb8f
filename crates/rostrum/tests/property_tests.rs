//! Property-based tests for the table pipeline.
//!
//! These tests use proptest to generate random tables and verify that
//! selection, cleaning, and aggregation keep their invariants.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p rostrum --test property_tests
//!
//! # More cases
//! PROPTEST_CASES=10000 cargo test -p rostrum --test property_tests
//! ```

use std::collections::HashSet;

use proptest::prelude::*;

use rostrum::clean::{CleanTable, RowCleaner, RowRules};
use rostrum::input::Parser;
use rostrum::normalize::{Normalizer, TableSelector};
use rostrum::{CanonicalSchema, Cell, DataTable, HeaderSynonyms, aggregate};

// =============================================================================
// Test Strategies
// =============================================================================

/// Header names: canonical, aliases, and noise.
fn header() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Name".to_string()),
        Just("Pos".to_string()),
        Just("Team".to_string()),
        Just("Age".to_string()),
        Just("DOB".to_string()),
        Just("Player".to_string()),
        Just("Club".to_string()),
        "[A-Za-z]{1,8}",
    ]
}

/// Name cells: real-looking names plus page chrome.
fn name_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Z][a-z]{2,8}, [A-Z][a-z]{1,6}",
        "[A-Z][a-z]{2,10}",
        Just("Name".to_string()),
        Just("name".to_string()),
        Just("A | B | C".to_string()),
        Just("".to_string()),
        Just("  ".to_string()),
        Just("nan".to_string()),
    ]
}

fn team_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Hawks".to_string()),
        Just("Tigers".to_string()),
        Just("Owls".to_string()),
        Just("".to_string()),
        Just("Team".to_string()),
    ]
}

fn pos_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("SS".to_string()),
        Just("P".to_string()),
        Just("Coach".to_string()),
        Just("".to_string()),
        Just("Pos".to_string()),
    ]
}

fn age_cell() -> impl Strategy<Value = String> {
    prop_oneof!["[0-9]{1,2}", Just("n/a".to_string()), Just("".to_string())]
}

/// Normalized player tables with columns Name, Pos, Team, Age.
fn player_table() -> impl Strategy<Value = DataTable> {
    prop::collection::vec((name_cell(), pos_cell(), team_cell(), age_cell()), 0..30).prop_map(
        |rows| {
            DataTable::new(
                vec!["Name".into(), "Pos".into(), "Team".into(), "Age".into()],
                rows.into_iter()
                    .map(|(n, p, t, a)| vec![n, p, t, a])
                    .collect(),
            )
        },
    )
}

fn candidate() -> impl Strategy<Value = DataTable> {
    prop::collection::vec(header(), 1..8)
        .prop_map(|headers| DataTable::new(headers, vec![vec!["x".to_string()]]))
}

fn cleaner() -> RowCleaner {
    RowCleaner::new(CanonicalSchema::default(), RowRules::defaults().unwrap())
}

fn text(cell: &Cell) -> String {
    cell.to_string()
}

// =============================================================================
// Selector Properties
// =============================================================================

proptest! {
    /// The selected table has the highest score, and is the first such table.
    #[test]
    fn selector_picks_first_best(tables in prop::collection::vec(candidate(), 1..6)) {
        let selector = TableSelector::new(CanonicalSchema::default());
        let scores: Vec<usize> = tables.iter().map(|t| selector.score(t)).collect();
        let best = *scores.iter().max().unwrap();
        let first_best = scores.iter().position(|s| *s == best).unwrap();

        let chosen = selector.select(tables).unwrap();
        prop_assert_eq!(chosen.score, best);
        prop_assert_eq!(chosen.index, first_best);
    }

    /// Normalization only ever leaves canonical, unique columns.
    #[test]
    fn normalizer_output_is_canonical(table in candidate()) {
        let schema = CanonicalSchema::default();
        let normalized = Normalizer::new(schema.clone(), HeaderSynonyms::default()).normalize(table);

        let unique: HashSet<&String> = normalized.headers.iter().collect();
        prop_assert_eq!(unique.len(), normalized.headers.len());
        for header in &normalized.headers {
            prop_assert!(schema.contains(header));
        }
        // Canonical order is preserved.
        let positions: Vec<usize> = normalized
            .headers
            .iter()
            .map(|h| schema.position(h).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}

// =============================================================================
// Cleaner Properties
// =============================================================================

proptest! {
    /// Kept rows have a real name, a team, and unique (Name, Team) keys.
    #[test]
    fn cleaner_keeps_only_valid_unique_rows(table in player_table()) {
        let result = cleaner().clean(table);
        let clean = &result.table;

        let mut keys = HashSet::new();
        for i in 0..clean.row_count() {
            let name = text(clean.get(i, "Name").unwrap());
            let team = text(clean.get(i, "Team").unwrap());

            prop_assert!(!name.trim().is_empty());
            prop_assert!(!name.eq_ignore_ascii_case("name"));
            prop_assert!(!name.contains('|'));
            prop_assert!(!team.is_empty());
            prop_assert!(keys.insert((name, team)));
        }

        prop_assert_eq!(clean.columns.len(), 12);
        prop_assert_eq!(
            result.report.kept_rows + result.report.dropped_total(),
            result.report.input_rows
        );
    }

    /// Age is numeric or missing after cleaning.
    #[test]
    fn cleaner_coerces_age(table in player_table()) {
        let clean = cleaner().clean(table).table;
        for i in 0..clean.row_count() {
            let age = clean.get(i, "Age").unwrap();
            prop_assert!(matches!(age, Cell::Number(_) | Cell::Missing));
        }
    }

    /// Cleaning an already clean table changes nothing.
    #[test]
    fn cleaner_is_idempotent(table in player_table()) {
        let cleaner = cleaner();
        let once = cleaner.clean(table).table;
        let twice = cleaner.clean(once.to_data_table()).table;
        prop_assert_eq!(once, twice);
    }
}

// =============================================================================
// Aggregator Properties
// =============================================================================

fn clean_table(rows: Vec<(String, String)>) -> CleanTable {
    CleanTable {
        columns: vec!["Name".into(), "Team".into()],
        rows: rows
            .into_iter()
            .map(|(n, t)| vec![Cell::text(n), Cell::text(t)])
            .collect(),
    }
}

proptest! {
    /// Rows are grouped by letter in processing order and sorted by Name within a letter.
    #[test]
    fn aggregate_orders_by_letter_then_name(
        a in prop::collection::vec(("[A-Z][a-z]{1,5}", "[A-Z][a-z]{1,5}"), 0..10),
        b in prop::collection::vec(("[A-Z][a-z]{1,5}", "[A-Z][a-z]{1,5}"), 0..10),
    ) {
        let total = a.len() + b.len();
        let dataset = aggregate(
            CanonicalSchema::default(),
            vec![("B", clean_table(b)), ("a", clean_table(a))],
        );

        prop_assert_eq!(dataset.len(), total);
        let records = dataset.records();
        for i in 1..records.len() {
            let (prev, cur) = (&records[i - 1], &records[i]);
            if prev.letter == cur.letter {
                let prev_key = (text(dataset.get(i - 1, "Name").unwrap()), text(dataset.get(i - 1, "Team").unwrap()));
                let cur_key = (text(dataset.get(i, "Name").unwrap()), text(dataset.get(i, "Team").unwrap()));
                prop_assert!(prev_key <= cur_key);
            } else {
                prop_assert_eq!(prev.letter.as_str(), "b");
                prop_assert_eq!(cur.letter.as_str(), "a");
            }
        }
    }
}

// =============================================================================
// Parser Robustness
// =============================================================================

proptest! {
    /// Discovery never panics on arbitrary markup.
    #[test]
    fn discover_never_panics(html in "(<table>|<tr>|<td>|<th>|</td>|</tr>|</table>|[a-z ]{0,5}){0,40}") {
        let _ = Parser::new().discover(html.as_bytes());
    }
}
