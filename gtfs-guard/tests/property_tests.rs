//! Property-based tests for the validation engine.
//!
//! ## Test Categories
//!
//! ### 1. Table containers
//! - Index completeness: every row is found through its own key
//! - Missing files: no rows and empty lookups for every key
//!
//! ### 2. Rules
//! - Inclusive ordering: equal dates never produce a notice
//! - Deduplication: one notice per unused shape id, however many rows carry it
//!
//! ### 3. Engine
//! - Determinism: repeated and parallel passes return the same notices
//! - Gate correctness: a closed gate means zero invocations

use chrono::{Duration, NaiveDate};
use gtfs_guard::config::EngineConfig;
use gtfs_guard::core::{NoticeContainer, RecordRule, RuleRegistry, ValidationEngine};
use gtfs_guard::error::RuleFault;
use gtfs_guard::gtfs::{CalendarRecord, ShapeRecord, TripRecord};
use gtfs_guard::rules::{default_registry, CalendarRangeRule, UnusedShapeRule};
use gtfs_guard::table::{ColumnInspector, FeedSnapshot, Record, TableContainer};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ============================================================================
// Generators
// ============================================================================

fn shape_id() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["A", "B", "C", "D", "E", "F"]).prop_map(str::to_string)
}

fn shapes_table(ids: &[String]) -> TableContainer<ShapeRecord> {
    TableContainer::from_rows(
        ["shape_id", "shape_pt_sequence"],
        ids.iter()
            .enumerate()
            .map(|(i, id)| ShapeRecord::new(i as u64 + 2, id.as_str(), i as u32 + 1))
            .collect(),
    )
}

fn trips_table(shape_ids: &[Option<String>]) -> TableContainer<TripRecord> {
    TableContainer::from_rows(
        ["route_id", "service_id", "trip_id", "shape_id"],
        shape_ids
            .iter()
            .enumerate()
            .map(|(i, shape_id)| {
                let trip = TripRecord::new(i as u64 + 2, "r", "s", format!("t{i}"));
                match shape_id {
                    Some(id) => trip.with_shape_id(id.as_str()),
                    None => trip,
                }
            })
            .collect(),
    )
}

fn calendar_table(offsets: &[(i64, i64)]) -> TableContainer<CalendarRecord> {
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    TableContainer::from_rows(
        ["service_id", "start_date", "end_date"],
        offsets
            .iter()
            .enumerate()
            .map(|(i, (start, end))| {
                CalendarRecord::new(i as u64 + 2, format!("s{i}"))
                    .with_range(base + Duration::days(*start), base + Duration::days(*end))
            })
            .collect(),
    )
}

fn feed(
    shapes: &[String],
    trips: &[Option<String>],
    calendar: &[(i64, i64)],
) -> FeedSnapshot {
    FeedSnapshot::builder()
        .table(shapes_table(shapes))
        .unwrap()
        .table(trips_table(trips))
        .unwrap()
        .table(calendar_table(calendar))
        .unwrap()
        .build()
}

struct CountingRule {
    calls: Arc<AtomicUsize>,
    column: String,
}

impl RecordRule for CountingRule {
    type Record = TripRecord;

    fn name(&self) -> &str {
        "counting"
    }

    fn should_call_validate(&self, columns: &dyn ColumnInspector) -> bool {
        columns.has_column(&self.column)
    }

    fn validate(
        &self,
        _record: &TripRecord,
        _notices: &mut NoticeContainer,
    ) -> Result<(), RuleFault> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Table containers
// ============================================================================

proptest! {
    /// Every row can be found through the index of each field it sets.
    #[test]
    fn test_index_completeness(
        trips in prop::collection::vec(prop::option::of(shape_id()), 0..60)
    ) {
        let table = trips_table(&trips);
        for trip in table.entities() {
            let found: Vec<u64> = table
                .by_index("trip_id", &trip.trip_id)
                .map(|t| t.csv_row_number())
                .collect();
            prop_assert!(found.contains(&trip.csv_row_number()));

            if let Some(shape_id) = &trip.shape_id {
                prop_assert!(table
                    .by_index("shape_id", shape_id)
                    .any(|t| t.csv_row_number() == trip.csv_row_number()));
            }
        }

        let with_shape = trips.iter().filter(|s| s.is_some()).count();
        let indexed: usize = ["A", "B", "C", "D", "E", "F"]
            .iter()
            .map(|id| table.by_index("shape_id", id).len())
            .sum();
        prop_assert_eq!(indexed, with_shape);
    }

    /// A missing file has no rows and every lookup comes back empty.
    #[test]
    fn test_missing_file_lookups(key in "[a-zA-Z0-9_]{0,12}") {
        let table = TableContainer::<TripRecord>::missing();
        prop_assert!(table.is_missing_file());
        prop_assert!(table.entities().is_empty());
        for field in ["trip_id", "shape_id", "service_id", "not_indexed"] {
            prop_assert_eq!(table.by_index(field, &key).len(), 0);
        }
    }
}

// ============================================================================
// Rules
// ============================================================================

proptest! {
    /// Exactly the rows whose start is strictly after their end are reported.
    #[test]
    fn test_inclusive_ordering_law(
        offsets in prop::collection::vec((0i64..30, 0i64..30), 1..40)
    ) {
        let snapshot = FeedSnapshot::builder()
            .table(calendar_table(&offsets))
            .unwrap()
            .build();
        let registry = RuleRegistry::builder().record_rule(CalendarRangeRule).build().unwrap();
        let report = ValidationEngine::new(registry, EngineConfig::default())
            .unwrap()
            .run(&snapshot)
            .unwrap();

        let expected: Vec<u64> = offsets
            .iter()
            .enumerate()
            .filter(|(_, (start, end))| start > end)
            .map(|(i, _)| i as u64 + 2)
            .collect();
        let reported: Vec<u64> = report
            .notices()
            .iter()
            .map(|n| n.get("csvRowNumber").and_then(|v| v.as_u64()).unwrap())
            .collect();
        prop_assert_eq!(reported, expected);
    }

    /// One notice per unused shape id, regardless of how many points it has.
    #[test]
    fn test_unused_shape_dedup(
        shapes in prop::collection::vec(shape_id(), 0..50),
        trips in prop::collection::vec(prop::option::of(shape_id()), 1..20)
    ) {
        let snapshot = feed(&shapes, &trips, &[]);
        let registry = RuleRegistry::builder().file_rule(UnusedShapeRule).build().unwrap();
        let report = ValidationEngine::new(registry, EngineConfig::default())
            .unwrap()
            .run(&snapshot)
            .unwrap();

        let used: BTreeSet<&str> = trips.iter().flatten().map(String::as_str).collect();
        let expected: BTreeSet<&str> = shapes
            .iter()
            .map(String::as_str)
            .filter(|id| !used.contains(id))
            .collect();
        let reported: Vec<String> = report
            .notices()
            .iter()
            .map(|n| n.get("shapeId").and_then(|v| v.as_str()).unwrap().to_string())
            .collect();

        prop_assert_eq!(reported.len(), expected.len());
        let reported_set: BTreeSet<&str> = reported.iter().map(String::as_str).collect();
        prop_assert_eq!(reported_set, expected);
    }
}

// ============================================================================
// Engine
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Sequential, repeated and sharded parallel passes agree.
    #[test]
    fn test_pass_determinism(
        shapes in prop::collection::vec(shape_id(), 0..30),
        trips in prop::collection::vec(prop::option::of(shape_id()), 0..30),
        calendar in prop::collection::vec((0i64..10, 0i64..10), 0..30),
        shard_size in 1usize..8
    ) {
        let snapshot = Arc::new(feed(&shapes, &trips, &calendar));
        let registry = default_registry().unwrap();

        let engine = ValidationEngine::new(registry.clone(), EngineConfig::default()).unwrap();
        let first = engine.run(&snapshot).unwrap();
        let second = engine.run(&snapshot).unwrap();
        prop_assert_eq!(&first.collected, &second.collected);

        let parallel_engine = ValidationEngine::new(
            registry,
            EngineConfig::default().with_parallel(true).with_shard_size(shard_size),
        )
        .unwrap();
        let rt = tokio::runtime::Runtime::new().unwrap();
        let parallel = rt.block_on(parallel_engine.run_parallel(snapshot)).unwrap();
        prop_assert_eq!(&first.collected, &parallel.collected);
        prop_assert_eq!(&first.rules, &parallel.rules);
    }

    /// A closed gate means no invocation at all; an open one means one per row.
    #[test]
    fn test_gate_correctness(
        trips in prop::collection::vec(prop::option::of(shape_id()), 0..40),
        column in prop::sample::select(vec![
            "shape_id",
            "trip_id",
            "wheelchair_accessible",
            "bikes_allowed",
        ])
    ) {
        let snapshot = FeedSnapshot::builder().table(trips_table(&trips)).unwrap().build();
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = RuleRegistry::builder()
            .record_rule(CountingRule { calls: Arc::clone(&calls), column: column.to_string() })
            .build()
            .unwrap();
        ValidationEngine::new(registry, EngineConfig::default())
            .unwrap()
            .run(&snapshot)
            .unwrap();

        let declared = ["route_id", "service_id", "trip_id", "shape_id"].contains(&column);
        let expected = if declared { trips.len() } else { 0 };
        prop_assert_eq!(calls.load(Ordering::SeqCst), expected);
    }
}
