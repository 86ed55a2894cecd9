//! Prelude for commonly used types and traits in gtfs-guard.

pub use crate::config::EngineConfig;
pub use crate::core::{
    FileRule, Notice, NoticeContainer, NoticeKind, RecordRule, RuleRegistry, Severity, TableSet,
    ValidationEngine, ValidationReport,
};
pub use crate::error::{ErrorContext, GuardError, Result, RuleFault};
pub use crate::logging::LogConfig;
pub use crate::table::{ColumnInspector, FeedSnapshot, Record, TableContainer, TableId};
