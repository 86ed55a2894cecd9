//! `trips.shape_id` must name a shape in `shapes.txt`.

use crate::core::{FileRule, NoticeContainer, NoticeKind, Severity, TableSet};
use crate::error::RuleFault;
use crate::gtfs::{ShapeRecord, TripRecord, SHAPES_FILE, TRIPS_FILE};
use crate::table::{Record, TableId};
use serde::Serialize;

/// A reference to a row of another table that does not exist.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKeyViolation {
    pub child_filename: &'static str,
    pub child_field_name: &'static str,
    pub parent_filename: &'static str,
    pub parent_field_name: &'static str,
    pub field_value: String,
    pub csv_row_number: u64,
}

impl NoticeKind for ForeignKeyViolation {
    const CODE: &'static str = "foreign_key_violation";
    const SEVERITY: Severity = Severity::Error;
}

/// Checks every trip's `shape_id` against the `shape_id` index of
/// `shapes.txt`. Trips without a shape are fine.
#[derive(Debug, Clone, Copy, Default)]
pub struct TripShapeReferenceRule;

impl FileRule for TripShapeReferenceRule {
    fn name(&self) -> &str {
        "trip_shape_reference"
    }

    fn dependencies(&self) -> Vec<TableId> {
        vec![TableId::of::<TripRecord>(), TableId::of::<ShapeRecord>()]
    }

    fn validate(
        &self,
        tables: &TableSet<'_>,
        notices: &mut NoticeContainer,
    ) -> Result<(), RuleFault> {
        let trips = tables.get::<TripRecord>()?;
        let shapes = tables.get::<ShapeRecord>()?;

        for trip in trips.entities() {
            let Some(shape_id) = trip.shape_id.as_deref() else {
                continue;
            };
            if shapes.by_index("shape_id", shape_id).next().is_none() {
                notices.push(ForeignKeyViolation {
                    child_filename: TRIPS_FILE,
                    child_field_name: "shape_id",
                    parent_filename: SHAPES_FILE,
                    parent_field_name: "shape_id",
                    field_value: shape_id.to_string(),
                    csv_row_number: trip.csv_row_number(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{FeedSnapshot, TableContainer};
    use crate::test_helpers::{shapes_table, trips_table};
    use serde_json::json;

    fn run(
        trips: TableContainer<TripRecord>,
        shapes: TableContainer<ShapeRecord>,
    ) -> NoticeContainer {
        let snapshot = FeedSnapshot::builder()
            .table(trips)
            .unwrap()
            .table(shapes)
            .unwrap()
            .build();
        let dependencies = TripShapeReferenceRule.dependencies();
        let mut notices = NoticeContainer::new();
        TripShapeReferenceRule
            .validate(&TableSet::new(&snapshot, &dependencies), &mut notices)
            .unwrap();
        notices
    }

    #[test]
    fn test_dangling_reference_is_reported_per_row() {
        let notices = run(
            trips_table(&[Some("A"), Some("Z"), None, Some("Z")]),
            shapes_table(&["A", "A"]),
        );

        assert_eq!(notices.len(), 2);
        let rows: Vec<_> = notices
            .notices()
            .iter()
            .map(|n| n.get("csvRowNumber").cloned().unwrap())
            .collect();
        assert_eq!(rows, vec![json!(3), json!(5)]);
        assert_eq!(notices.notices()[0].get("fieldValue"), Some(&json!("Z")));
        assert_eq!(
            notices.notices()[0].get("parentFilename"),
            Some(&json!("shapes.txt"))
        );
    }

    #[test]
    fn test_missing_shapes_file_breaks_every_reference() {
        let notices = run(trips_table(&[Some("A"), None]), TableContainer::missing());
        assert_eq!(notices.len(), 1);
    }
}
