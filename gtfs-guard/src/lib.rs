//! # gtfs-guard - Validation engine for GTFS feeds
//!
//! gtfs-guard runs a catalogue of business rules over an already decoded
//! transit feed and collects what they find as severity-classified notices.
//! It does not read CSV files and does not render reports: the decoding layer
//! hands it a [`FeedSnapshot`](table::FeedSnapshot) of typed tables and the
//! host serializes the [`ValidationReport`](core::ValidationReport) it gets
//! back.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use gtfs_guard::prelude::*;
//! use gtfs_guard::gtfs::CalendarRecord;
//! use gtfs_guard::rules::CalendarRangeRule;
//!
//! # fn main() -> gtfs_guard::error::Result<()> {
//! let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
//!
//! // Tables come from the decoding layer; here we build one by hand.
//! let calendar = TableContainer::from_rows(
//!     ["service_id", "start_date", "end_date"],
//!     vec![
//!         CalendarRecord::new(2, "W").with_range(date(2024, 1, 10), date(2024, 1, 1)),
//!         CalendarRecord::new(3, "X").with_range(date(2024, 1, 1), date(2024, 1, 1)),
//!     ],
//! );
//! let snapshot = FeedSnapshot::builder().table(calendar)?.build();
//!
//! let registry = RuleRegistry::builder().record_rule(CalendarRangeRule).build()?;
//! let engine = ValidationEngine::new(registry, EngineConfig::default())?;
//! let report = engine.run(&snapshot)?;
//!
//! assert!(report.has_errors());
//! for notice in report.notices() {
//!     println!("{} {}: {:?}", notice.severity(), notice.code(), notice.context());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Rules
//!
//! A rule has one of two shapes:
//!
//! - [`FileRule`](core::FileRule): runs once per pass with access to the
//!   whole tables it declared. Cross-table references, aggregate checks and
//!   "file X requires file Y" belong here.
//! - [`RecordRule`](core::RecordRule): runs once per row of one table and may
//!   opt out of a pass when the table's header lacks a column.
//!
//! Rules are registered explicitly in a [`RuleRegistry`](core::RuleRegistry).
//! [`rules::default_registry`] bundles the rules shipped with this crate.
//!
//! ## Failure handling
//!
//! A rule that returns a [`RuleFault`](error::RuleFault) or panics does not
//! stop the pass. The engine records a `rule_execution_fault` system error
//! and moves on, so the report holds every notice that could be computed.
//!
//! ## Parallel passes
//!
//! [`ValidationEngine::run_parallel`](core::ValidationEngine::run_parallel)
//! spreads rules and row shards over tokio's blocking pool and merges the
//! results in registration order, so its report matches a sequential run.
//!
//! ## Architecture
//!
//! - **`table`**: records, table containers, indices and the feed snapshot
//! - **`core`**: notices, the sink, rule contracts, registry and engine
//! - **`gtfs`**: typed records for the GTFS files the bundled rules read
//! - **`rules`**: bundled rules
//! - **`config`**: engine configuration
//! - **`logging`**: `tracing` setup helpers

pub mod config;
pub mod core;
pub mod error;
pub mod gtfs;
pub mod logging;
pub mod prelude;
pub mod rules;
pub mod table;

#[cfg(test)]
pub mod test_helpers;
