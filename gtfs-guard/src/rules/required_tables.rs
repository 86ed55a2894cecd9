//! Files a feed cannot do without.

use crate::core::{FileRule, NoticeContainer, NoticeKind, Severity, TableSet};
use crate::error::RuleFault;
use crate::gtfs::{StopTimeRecord, TripRecord};
use crate::table::{TableId, TableStatus};
use serde::Serialize;

/// A required file is not part of the feed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingRequiredFile {
    pub filename: &'static str,
}

impl NoticeKind for MissingRequiredFile {
    const CODE: &'static str = "missing_required_file";
    const SEVERITY: Severity = Severity::Error;
}

/// A required file is present but holds no data rows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmptyFile {
    pub filename: &'static str,
}

impl NoticeKind for EmptyFile {
    const CODE: &'static str = "empty_file";
    const SEVERITY: Severity = Severity::Warning;
}

/// Tells an absent required file apart from a present but empty one.
///
/// ```rust
/// use gtfs_guard::core::FileRule;
/// use gtfs_guard::rules::RequiredTablesRule;
/// use gtfs_guard::table::TableId;
///
/// let rule = RequiredTablesRule::new(vec![TableId::new("agency.txt")]);
/// assert_eq!(rule.dependencies(), vec![TableId::new("agency.txt")]);
/// ```
#[derive(Debug, Clone)]
pub struct RequiredTablesRule {
    tables: Vec<TableId>,
}

impl RequiredTablesRule {
    /// Requires the given tables.
    pub fn new(tables: Vec<TableId>) -> Self {
        Self { tables }
    }
}

impl Default for RequiredTablesRule {
    /// Requires `trips.txt` and `stop_times.txt`, the bundled records that
    /// every GTFS feed must carry.
    fn default() -> Self {
        Self::new(vec![
            TableId::of::<TripRecord>(),
            TableId::of::<StopTimeRecord>(),
        ])
    }
}

impl FileRule for RequiredTablesRule {
    fn name(&self) -> &str {
        "required_tables"
    }

    fn dependencies(&self) -> Vec<TableId> {
        self.tables.clone()
    }

    fn runs_on_unparsable_tables(&self) -> bool {
        true
    }

    fn validate(
        &self,
        tables: &TableSet<'_>,
        notices: &mut NoticeContainer,
    ) -> Result<(), RuleFault> {
        for &id in &self.tables {
            match tables.get_any(id)?.status() {
                TableStatus::MissingFile => notices.push(MissingRequiredFile {
                    filename: id.filename(),
                }),
                TableStatus::EmptyFile => notices.push(EmptyFile {
                    filename: id.filename(),
                }),
                _ => {}
            }
        }
        Ok(())
    }
}
