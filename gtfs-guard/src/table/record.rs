//! The row contract shared by every table.

use std::fmt::Debug;

/// Identity of a table inside a feed snapshot.
///
/// Tables are identified by the GTFS filename they were decoded from, which
/// is also the name used in notice context fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(&'static str);

impl TableId {
    /// Creates a table identity from a filename such as `"trips.txt"`.
    pub const fn new(filename: &'static str) -> Self {
        Self(filename)
    }

    /// Returns the filename this identity stands for.
    pub const fn filename(&self) -> &'static str {
        self.0
    }

    /// Returns the identity of the table holding records of type `R`.
    pub const fn of<R: Record>() -> Self {
        R::TABLE
    }
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// A single decoded row of a table.
///
/// Records are produced by the decoding layer and are immutable afterwards.
/// Optional GTFS fields are modelled as `Option<T>` so that an absent value is
/// never confused with a default or zero value.
///
/// Tables that need keyed lookups list the indexed fields in
/// [`Record::INDEXED_FIELDS`] and return the key for each of them from
/// [`Record::index_key`]. The container builds one index per listed field.
pub trait Record: Debug + Send + Sync + 'static {
    /// The table this record type belongs to.
    const TABLE: TableId;

    /// Fields the container indexes for keyed lookups.
    const INDEXED_FIELDS: &'static [&'static str] = &[];

    /// 1-based row number in the source file, counting the header as row 1.
    fn csv_row_number(&self) -> u64;

    /// Value of an indexed field, or `None` when the field is not set on
    /// this row. Only called with names from [`Record::INDEXED_FIELDS`].
    fn index_key(&self, _field: &str) -> Option<&str> {
        None
    }
}
