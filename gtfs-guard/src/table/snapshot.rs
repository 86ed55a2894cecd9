//! The complete set of decoded tables for one validation pass.

use super::container::{AnyTable, TableContainer};
use super::record::{Record, TableId};
use crate::error::{GuardError, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Every decoded table of a feed, keyed by table identity.
///
/// The snapshot is assembled by the decoding layer before a pass starts and
/// is shared read-only by all rules.
///
/// # Examples
///
/// ```rust
/// use gtfs_guard::gtfs::{ShapeRecord, TripRecord};
/// use gtfs_guard::table::{FeedSnapshot, TableContainer};
///
/// # fn main() -> gtfs_guard::error::Result<()> {
/// let snapshot = FeedSnapshot::builder()
///     .table(TableContainer::<TripRecord>::missing())?
///     .table(TableContainer::<ShapeRecord>::from_rows(["shape_id"], vec![]))?
///     .build();
///
/// assert!(snapshot.table::<TripRecord>().unwrap().is_missing_file());
/// assert_eq!(snapshot.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct FeedSnapshot {
    tables: BTreeMap<TableId, Arc<dyn AnyTable>>,
}

impl FeedSnapshot {
    /// Creates a new builder.
    pub fn builder() -> FeedSnapshotBuilder {
        FeedSnapshotBuilder::default()
    }

    /// The typed container for records of type `R`, if present.
    pub fn table<R: Record>(&self) -> Option<&TableContainer<R>> {
        self.tables
            .get(&R::TABLE)
            .and_then(|table| table.as_any().downcast_ref::<TableContainer<R>>())
    }

    /// The type-erased container for `id`, if present.
    pub fn get(&self, id: TableId) -> Option<&dyn AnyTable> {
        self.tables.get(&id).map(Arc::as_ref)
    }

    /// True if the snapshot holds a container for `id`.
    pub fn contains(&self, id: TableId) -> bool {
        self.tables.contains_key(&id)
    }

    /// Table identities in a stable order.
    pub fn table_ids(&self) -> impl Iterator<Item = TableId> + '_ {
        self.tables.keys().copied()
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// True when the snapshot holds no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Builder for [`FeedSnapshot`].
#[derive(Debug, Default)]
pub struct FeedSnapshotBuilder {
    tables: BTreeMap<TableId, Arc<dyn AnyTable>>,
}

impl FeedSnapshotBuilder {
    /// Adds a container; fails if one for the same table was already added.
    pub fn table<R: Record>(mut self, container: TableContainer<R>) -> Result<Self> {
        let id = R::TABLE;
        if self.tables.contains_key(&id) {
            return Err(GuardError::DuplicateTable {
                table: id.filename().to_string(),
            });
        }
        self.tables.insert(id, Arc::new(container));
        Ok(self)
    }

    /// Finishes the snapshot.
    pub fn build(self) -> FeedSnapshot {
        FeedSnapshot {
            tables: self.tables,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gtfs::{CalendarRecord, TripRecord};

    #[test]
    fn test_duplicate_table_is_rejected() {
        let result = FeedSnapshot::builder()
            .table(TableContainer::<TripRecord>::missing())
            .and_then(|b| b.table(TableContainer::<TripRecord>::missing()));

        assert!(matches!(
            result,
            Err(GuardError::DuplicateTable { ref table }) if table == "trips.txt"
        ));
    }

    #[test]
    fn test_absent_table_is_none() {
        let snapshot = FeedSnapshot::builder()
            .table(TableContainer::<TripRecord>::missing())
            .unwrap()
            .build();

        assert!(snapshot.table::<CalendarRecord>().is_none());
        assert!(!snapshot.contains(TableId::of::<CalendarRecord>()));
        assert!(snapshot.get(TableId::new("trips.txt")).is_some());
    }
}
