//! Typed, indexed, read-only collections of records.

use super::index::FieldIndex;
use super::record::{Record, TableId};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::HashMap;
use std::fmt::Debug;

/// How a table came out of the decoding layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    /// The file was not present in the feed at all.
    MissingFile,
    /// The file was present but had no data rows.
    EmptyFile,
    /// The file's header could not be accepted.
    InvalidHeaders,
    /// The header was fine but some rows failed to decode.
    UnparsableRows,
    /// Header and all rows decoded.
    Parsed,
}

impl TableStatus {
    /// Returns true when every row that exists in the file was decoded.
    pub fn is_parsed_successfully(&self) -> bool {
        matches!(self, TableStatus::Parsed | TableStatus::EmptyFile)
    }
}

/// Answers questions about a table's declared schema.
///
/// The answer reflects the header of the source file and is independent of
/// whether any row actually sets a value for the column.
pub trait ColumnInspector {
    /// Returns true if the table's header declares `column`.
    fn has_column(&self, column: &str) -> bool;
}

/// The columns declared in a table's header, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableHeader {
    columns: Vec<String>,
}

impl TableHeader {
    /// Creates a header from column names.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Column names in source order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl ColumnInspector for TableHeader {
    fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// All rows of one table plus their derived indices.
///
/// A container is built once per feed snapshot and never mutated afterwards.
/// Every index is derived eagerly from the row vector at construction, so no
/// index can point at a row the container does not hold.
///
/// # Examples
///
/// ```rust
/// use gtfs_guard::gtfs::TripRecord;
/// use gtfs_guard::table::TableContainer;
///
/// let trips = TableContainer::from_rows(
///     ["route_id", "service_id", "trip_id", "shape_id"],
///     vec![
///         TripRecord::new(2, "r1", "weekday", "t1").with_shape_id("A"),
///         TripRecord::new(3, "r1", "weekday", "t2").with_shape_id("A"),
///     ],
/// );
///
/// assert_eq!(trips.by_index("shape_id", "A").count(), 2);
/// assert_eq!(trips.by_index("shape_id", "B").count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct TableContainer<R: Record> {
    status: TableStatus,
    header: TableHeader,
    rows: Vec<R>,
    indices: HashMap<&'static str, FieldIndex>,
}

impl<R: Record> TableContainer<R> {
    /// A container for a file that was absent from the feed.
    pub fn missing() -> Self {
        Self::without_rows(TableStatus::MissingFile, TableHeader::default())
    }

    /// A container for a present file and its decoded rows.
    ///
    /// The status is [`TableStatus::EmptyFile`] when `rows` is empty and
    /// [`TableStatus::Parsed`] otherwise.
    pub fn from_rows<I, S>(columns: I, rows: Vec<R>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let status = if rows.is_empty() {
            TableStatus::EmptyFile
        } else {
            TableStatus::Parsed
        };
        let indices = R::INDEXED_FIELDS
            .iter()
            .map(|&field| {
                let index = FieldIndex::build(field, rows.iter().map(|row| row.index_key(field)));
                (field, index)
            })
            .collect();

        Self {
            status,
            header: TableHeader::new(columns),
            rows,
            indices,
        }
    }

    /// A container for a file whose header was rejected.
    pub fn invalid_headers<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::without_rows(TableStatus::InvalidHeaders, TableHeader::new(columns))
    }

    /// A container for a file with rows that failed to decode.
    pub fn unparsable_rows<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::without_rows(TableStatus::UnparsableRows, TableHeader::new(columns))
    }

    fn without_rows(status: TableStatus, header: TableHeader) -> Self {
        let indices = R::INDEXED_FIELDS
            .iter()
            .map(|&field| (field, FieldIndex::build(field, std::iter::empty())))
            .collect();
        Self {
            status,
            header,
            rows: Vec::new(),
            indices,
        }
    }

    /// Identity of the table.
    pub fn table_id(&self) -> TableId {
        R::TABLE
    }

    /// GTFS filename of the table, used in notice context.
    pub fn filename(&self) -> &'static str {
        R::TABLE.filename()
    }

    /// How the table came out of decoding.
    pub fn status(&self) -> TableStatus {
        self.status
    }

    /// True iff the file was entirely absent from the feed.
    pub fn is_missing_file(&self) -> bool {
        self.status == TableStatus::MissingFile
    }

    /// True when every row present in the file was decoded.
    pub fn is_parsed_successfully(&self) -> bool {
        self.status.is_parsed_successfully()
    }

    /// All rows in source order.
    pub fn entities(&self) -> &[R] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the container holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The declared header.
    pub fn header(&self) -> &TableHeader {
        &self.header
    }

    /// The index built for `field`, if the record type indexes it.
    pub fn index(&self, field: &str) -> Option<&FieldIndex> {
        self.indices.get(field)
    }

    /// Rows whose indexed `field` equals `key`, in source order.
    ///
    /// Yields nothing when no row matches, when the table is missing, or when
    /// `field` is not one of the record type's indexed fields.
    pub fn by_index<'a>(&'a self, field: &str, key: &str) -> Rows<'a, R> {
        let positions = self
            .indices
            .get(field)
            .map(|index| index.positions(key))
            .unwrap_or(&[]);
        Rows {
            rows: &self.rows,
            positions: positions.iter(),
        }
    }

    /// True if at least one row has `key` in the indexed `field`.
    pub fn contains_key(&self, field: &str, key: &str) -> bool {
        self.by_index(field, key).len() > 0
    }
}

impl<R: Record> ColumnInspector for TableContainer<R> {
    fn has_column(&self, column: &str) -> bool {
        self.header.has_column(column)
    }
}

/// Iterator over the rows matched by an index lookup.
#[derive(Debug, Clone)]
pub struct Rows<'a, R> {
    rows: &'a [R],
    positions: std::slice::Iter<'a, usize>,
}

impl<'a, R> Iterator for Rows<'a, R> {
    type Item = &'a R;

    fn next(&mut self) -> Option<Self::Item> {
        self.positions.next().map(|&position| &self.rows[position])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl<R> ExactSizeIterator for Rows<'_, R> {}

/// Type-erased view of a container, used by the snapshot and the engine.
pub trait AnyTable: Debug + Send + Sync {
    /// Identity of the table.
    fn table_id(&self) -> TableId;

    /// How the table came out of decoding.
    fn status(&self) -> TableStatus;

    /// Number of rows.
    fn row_count(&self) -> usize;

    /// The declared header.
    fn header(&self) -> &TableHeader;

    /// Access for downcasting to the concrete container.
    fn as_any(&self) -> &dyn Any;
}

impl<R: Record> AnyTable for TableContainer<R> {
    fn table_id(&self) -> TableId {
        R::TABLE
    }

    fn status(&self) -> TableStatus {
        self.status
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn header(&self) -> &TableHeader {
        &self.header
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gtfs::{ShapeRecord, TripRecord};

    fn trips() -> TableContainer<TripRecord> {
        TableContainer::from_rows(
            ["route_id", "service_id", "trip_id", "shape_id"],
            vec![
                TripRecord::new(2, "r1", "s1", "t1").with_shape_id("A"),
                TripRecord::new(3, "r1", "s1", "t2"),
                TripRecord::new(4, "r2", "s1", "t3").with_shape_id("A"),
            ],
        )
    }

    #[test]
    fn test_missing_file_has_no_rows_and_empty_lookups() {
        let table = TableContainer::<TripRecord>::missing();

        assert!(table.is_missing_file());
        assert_eq!(table.status(), TableStatus::MissingFile);
        assert!(table.entities().is_empty());
        assert_eq!(table.by_index("shape_id", "A").count(), 0);
        assert_eq!(table.by_index("trip_id", "t1").count(), 0);
        assert!(!table.has_column("trip_id"));
    }

    #[test]
    fn test_present_but_empty_is_not_missing() {
        let table = TableContainer::<ShapeRecord>::from_rows(
            ["shape_id", "shape_pt_lat", "shape_pt_lon", "shape_pt_sequence"],
            vec![],
        );

        assert!(!table.is_missing_file());
        assert_eq!(table.status(), TableStatus::EmptyFile);
        assert!(table.is_parsed_successfully());
        assert!(table.has_column("shape_id"));
    }

    #[test]
    fn test_lookup_by_foreign_key() {
        let table = trips();
        let rows: Vec<u64> = table
            .by_index("shape_id", "A")
            .map(|trip| trip.csv_row_number())
            .collect();

        assert_eq!(rows, vec![2, 4]);
        assert!(table.contains_key("trip_id", "t2"));
        assert!(!table.contains_key("shape_id", "B"));
    }

    #[test]
    fn test_lookup_on_unindexed_field_is_empty() {
        let table = trips();
        assert_eq!(table.by_index("route_short_name", "r1").count(), 0);
        assert!(table.index("route_short_name").is_none());
    }

    #[test]
    fn test_failed_statuses_hold_no_rows() {
        let invalid = TableContainer::<TripRecord>::invalid_headers(["trip_id", "trip_id"]);
        assert_eq!(invalid.status(), TableStatus::InvalidHeaders);
        assert!(invalid.is_empty());
        assert!(!invalid.is_parsed_successfully());

        let unparsable = TableContainer::<TripRecord>::unparsable_rows(["trip_id"]);
        assert_eq!(unparsable.status(), TableStatus::UnparsableRows);
        assert!(!unparsable.is_missing_file());
    }

    #[test]
    fn test_type_erased_view_downcasts() {
        let table = trips();
        let erased: &dyn AnyTable = &table;

        assert_eq!(erased.table_id().filename(), "trips.txt");
        assert_eq!(erased.row_count(), 3);
        assert!(erased
            .as_any()
            .downcast_ref::<TableContainer<TripRecord>>()
            .is_some());
        assert!(erased
            .as_any()
            .downcast_ref::<TableContainer<ShapeRecord>>()
            .is_none());
    }
}
