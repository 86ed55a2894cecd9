//! Core validation types: notices, rules and the engine that runs them.
//!
//! ## Overview
//!
//! A pass starts from a [`RuleRegistry`] and a
//! [`FeedSnapshot`](crate::table::FeedSnapshot). The [`ValidationEngine`]
//! resolves every rule's tables, gates per-record rules on the table's
//! declared columns, runs the rules and collects their findings into a
//! [`NoticeSink`]. The result is a [`ValidationReport`].
//!
//! ## Example
//!
//! ```rust
//! use gtfs_guard::config::EngineConfig;
//! use gtfs_guard::core::{Severity, ValidationEngine};
//! use gtfs_guard::gtfs::{ShapeRecord, TripRecord};
//! use gtfs_guard::rules::default_registry;
//! use gtfs_guard::table::{FeedSnapshot, TableContainer};
//!
//! # fn main() -> gtfs_guard::error::Result<()> {
//! let shapes = TableContainer::from_rows(
//!     ["shape_id", "shape_pt_sequence"],
//!     vec![ShapeRecord::new(2, "A", 1), ShapeRecord::new(3, "B", 1)],
//! );
//! let trips = TableContainer::from_rows(
//!     ["route_id", "service_id", "trip_id", "shape_id"],
//!     vec![TripRecord::new(2, "r1", "weekday", "t1").with_shape_id("A")],
//! );
//! let snapshot = FeedSnapshot::builder().table(shapes)?.table(trips)?.build();
//!
//! let engine = ValidationEngine::new(default_registry()?, EngineConfig::default())?;
//! let report = engine.run(&snapshot)?;
//!
//! assert_eq!(report.notices_of("unused_shape").count(), 1);
//! assert!(report.count_by_severity(Severity::Warning) >= 1);
//! # Ok(())
//! # }
//! ```

pub mod diagnostics;
pub mod engine;
pub mod notice;
pub mod registry;
pub mod result;
pub mod rule;
pub mod severity;
pub mod sink;

pub use diagnostics::{
    NoticeSeverityConflict, RuleExecutionFault, RulePhase, UnresolvedTableDependency,
};
pub use engine::ValidationEngine;
pub use notice::{Notice, NoticeContainer, NoticeKind};
pub use registry::{RuleEntry, RuleKind, RuleRegistry, RuleRegistryBuilder};
pub use result::{RuleOutcome, RuleReport, RunMetrics, SkipReason, ValidationReport};
pub use rule::{FileRule, RecordRule, TableSet};
pub use severity::Severity;
pub use sink::{CollectedNotices, NoticeSink, NoticeSummary};
