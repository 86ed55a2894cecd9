//! Table containers: the read-only view rules have of a decoded feed.
//!
//! ## Overview
//!
//! - **[`Record`]**: one decoded row, with its source row number
//! - **[`TableContainer`]**: all rows of one table, its [`TableStatus`],
//!   declared header and eagerly built [`FieldIndex`]es
//! - **[`ColumnInspector`]**: schema questions used to gate optional rules
//! - **[`FeedSnapshot`]**: every table of the feed, keyed by [`TableId`]
//!
//! Lookups never fail for "not found" conditions. A missing table yields an
//! empty row slice and empty index lookups, so rule bodies can stay branch
//! free in the common case.

mod container;
mod index;
mod record;
mod snapshot;

pub use container::{AnyTable, ColumnInspector, Rows, TableContainer, TableHeader, TableStatus};
pub use index::FieldIndex;
pub use record::{Record, TableId};
pub use snapshot::{FeedSnapshot, FeedSnapshotBuilder};
