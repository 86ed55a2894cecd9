//! The two shapes a validation rule can take.
//!
//! - [`FileRule`] examines whole tables and runs once per pass. Anything that
//!   spans rows or tables belongs here: references between tables, aggregate
//!   checks, "file X requires file Y".
//! - [`RecordRule`] examines one row at a time, in source order, and may opt
//!   out of a pass through a column gate.
//!
//! Both receive a [`NoticeContainer`] to emit into and may return a
//! [`RuleFault`] when they cannot finish. Rules never deduplicate through the
//! engine: a rule that must report a key once, however many rows carry it,
//! tracks the keys it already reported itself.

use super::NoticeContainer;
use crate::error::RuleFault;
use crate::table::{AnyTable, ColumnInspector, FeedSnapshot, Record, TableContainer, TableId};
use std::ops::Range;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// A rule that reads one or more whole tables.
///
/// # Examples
///
/// ```rust
/// use gtfs_guard::core::{FileRule, NoticeContainer, TableSet};
/// use gtfs_guard::error::RuleFault;
/// use gtfs_guard::gtfs::TripRecord;
/// use gtfs_guard::table::TableId;
///
/// struct CountTrips;
///
/// impl FileRule for CountTrips {
///     fn name(&self) -> &str {
///         "count_trips"
///     }
///
///     fn dependencies(&self) -> Vec<TableId> {
///         vec![TableId::of::<TripRecord>()]
///     }
///
///     fn validate(
///         &self,
///         tables: &TableSet<'_>,
///         _notices: &mut NoticeContainer,
///     ) -> Result<(), RuleFault> {
///         let trips = tables.get::<TripRecord>()?;
///         let _count = trips.len();
///         Ok(())
///     }
/// }
/// ```
pub trait FileRule: Send + Sync {
    /// Unique name of the rule.
    fn name(&self) -> &str;

    /// Tables the rule reads. The engine resolves these before calling
    /// [`FileRule::validate`] and only these are reachable through the
    /// [`TableSet`].
    fn dependencies(&self) -> Vec<TableId>;

    /// Whether the rule still runs when a dependency failed to decode.
    ///
    /// Rules that only look at a table's status, never its rows, return true
    /// so a broken table does not hide their findings about other tables.
    fn runs_on_unparsable_tables(&self) -> bool {
        false
    }

    /// Runs the rule. Must be idempotent for a given snapshot.
    fn validate(&self, tables: &TableSet<'_>, notices: &mut NoticeContainer)
        -> Result<(), RuleFault>;
}

/// A rule that examines one record at a time.
///
/// # Examples
///
/// ```rust
/// use gtfs_guard::core::{NoticeContainer, RecordRule};
/// use gtfs_guard::error::RuleFault;
/// use gtfs_guard::gtfs::StopTimeRecord;
/// use gtfs_guard::table::ColumnInspector;
///
/// struct FlexOnly;
///
/// impl RecordRule for FlexOnly {
///     type Record = StopTimeRecord;
///
///     fn name(&self) -> &str {
///         "flex_only"
///     }
///
///     fn should_call_validate(&self, columns: &dyn ColumnInspector) -> bool {
///         columns.has_column("start_pickup_drop_off_window")
///     }
///
///     fn validate(
///         &self,
///         _record: &StopTimeRecord,
///         _notices: &mut NoticeContainer,
///     ) -> Result<(), RuleFault> {
///         Ok(())
///     }
/// }
/// ```
pub trait RecordRule: Send + Sync {
    /// The table's record type.
    type Record: Record;

    /// Unique name of the rule.
    fn name(&self) -> &str;

    /// Gate evaluated once per pass against the table's declared header.
    /// When it returns false, `validate` is not called for any row.
    fn should_call_validate(&self, _columns: &dyn ColumnInspector) -> bool {
        true
    }

    /// Examines one record.
    fn validate(&self, record: &Self::Record, notices: &mut NoticeContainer)
        -> Result<(), RuleFault>;
}

/// The tables a [`FileRule`] declared, resolved from the current snapshot.
#[derive(Debug, Clone, Copy)]
pub struct TableSet<'a> {
    snapshot: &'a FeedSnapshot,
    declared: &'a [TableId],
}

impl<'a> TableSet<'a> {
    pub(crate) fn new(snapshot: &'a FeedSnapshot, declared: &'a [TableId]) -> Self {
        Self { snapshot, declared }
    }

    /// The typed container of a declared table.
    pub fn get<R: Record>(&self) -> Result<&'a TableContainer<R>, RuleFault> {
        self.get_any(R::TABLE)?
            .as_any()
            .downcast_ref::<TableContainer<R>>()
            .ok_or_else(|| RuleFault::TableTypeMismatch {
                table: R::TABLE.filename().to_string(),
            })
    }

    /// The type-erased container of a declared table.
    pub fn get_any(&self, id: TableId) -> Result<&'a dyn AnyTable, RuleFault> {
        let undeclared = || RuleFault::UndeclaredTable {
            table: id.filename().to_string(),
        };
        if !self.declared.contains(&id) {
            return Err(undeclared());
        }
        self.snapshot.get(id).ok_or_else(undeclared)
    }
}

/// A fault raised on one row of a per-record rule.
#[derive(Debug, Clone)]
pub(crate) struct RowFault {
    pub csv_row_number: Option<u64>,
    pub fault: RuleFault,
}

/// Object-safe view of a [`RecordRule`] with its record type erased.
pub(crate) trait DynRecordRule: Send + Sync {
    fn name(&self) -> &str;

    fn table(&self) -> TableId;

    fn gate(&self, table: &dyn AnyTable) -> bool;

    /// Validates the rows at `range`, returning how many invocations ran.
    fn validate_range(
        &self,
        table: &dyn AnyTable,
        range: Range<usize>,
        notices: &mut NoticeContainer,
        faults: &mut Vec<RowFault>,
    ) -> usize;
}

impl<V: RecordRule> DynRecordRule for V {
    fn name(&self) -> &str {
        RecordRule::name(self)
    }

    fn table(&self) -> TableId {
        V::Record::TABLE
    }

    fn gate(&self, table: &dyn AnyTable) -> bool {
        self.should_call_validate(table.header())
    }

    fn validate_range(
        &self,
        table: &dyn AnyTable,
        range: Range<usize>,
        notices: &mut NoticeContainer,
        faults: &mut Vec<RowFault>,
    ) -> usize {
        let Some(container) = table.as_any().downcast_ref::<TableContainer<V::Record>>() else {
            faults.push(RowFault {
                csv_row_number: None,
                fault: RuleFault::TableTypeMismatch {
                    table: V::Record::TABLE.filename().to_string(),
                },
            });
            return 0;
        };

        let rows = container.entities().get(range).unwrap_or(&[]);
        for record in rows {
            if let Err(fault) = guarded(|| RecordRule::validate(self, record, notices)) {
                faults.push(RowFault {
                    csv_row_number: Some(record.csv_row_number()),
                    fault,
                });
            }
        }
        rows.len()
    }
}

/// Runs `f`, turning both returned faults and panics into a [`RuleFault`].
pub(crate) fn guarded<T, F>(f: F) -> Result<T, RuleFault>
where
    F: FnOnce() -> Result<T, RuleFault>,
{
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| Err(RuleFault::from_panic(payload)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gtfs::{CalendarRecord, ShapeRecord, TripRecord};

    #[test]
    fn test_table_set_only_exposes_declared_tables() {
        let snapshot = FeedSnapshot::builder()
            .table(TableContainer::<TripRecord>::missing())
            .unwrap()
            .table(TableContainer::<ShapeRecord>::missing())
            .unwrap()
            .build();
        let declared = [TableId::of::<TripRecord>()];
        let tables = TableSet::new(&snapshot, &declared);

        assert!(tables.get::<TripRecord>().unwrap().is_missing_file());
        assert_eq!(
            tables.get::<ShapeRecord>().unwrap_err(),
            RuleFault::UndeclaredTable {
                table: "shapes.txt".to_string()
            }
        );
        assert!(tables.get::<CalendarRecord>().is_err());
    }

    #[test]
    fn test_guarded_converts_panics() {
        let result: Result<(), RuleFault> = guarded(|| panic!("bad assumption"));
        assert_eq!(
            result.unwrap_err(),
            RuleFault::Panicked {
                message: "bad assumption".to_string()
            }
        );

        let result = guarded(|| Err::<(), _>(RuleFault::predicate("nope")));
        assert_eq!(result.unwrap_err().kind(), "predicate");

        assert_eq!(guarded(|| Ok(5)).unwrap(), 5);
    }
}
