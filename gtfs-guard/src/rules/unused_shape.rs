//! Shapes that no trip uses.

use crate::core::{FileRule, NoticeContainer, NoticeKind, Severity, TableSet};
use crate::error::RuleFault;
use crate::gtfs::{ShapeRecord, TripRecord, SHAPES_FILE};
use crate::table::{Record, TableId};
use serde::Serialize;
use std::collections::HashSet;

/// A shape is defined but never referenced by `trips.txt`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnusedShape {
    pub filename: &'static str,
    /// Row of the shape's first point
    pub csv_row_number: u64,
    pub shape_id: String,
}

impl NoticeKind for UnusedShape {
    const CODE: &'static str = "unused_shape";
    const SEVERITY: Severity = Severity::Warning;
}

/// Reports each unused shape once, at the row of its first point.
///
/// A shape spans many rows of `shapes.txt`; the rule keeps its own set of
/// shape ids it already looked at. Nothing is reported when `trips.txt` is
/// absent, since the missing file is reported elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnusedShapeRule;

impl FileRule for UnusedShapeRule {
    fn name(&self) -> &str {
        "unused_shape"
    }

    fn dependencies(&self) -> Vec<TableId> {
        vec![TableId::of::<ShapeRecord>(), TableId::of::<TripRecord>()]
    }

    fn validate(
        &self,
        tables: &TableSet<'_>,
        notices: &mut NoticeContainer,
    ) -> Result<(), RuleFault> {
        let shapes = tables.get::<ShapeRecord>()?;
        let trips = tables.get::<TripRecord>()?;
        if trips.is_missing_file() {
            return Ok(());
        }

        let mut seen = HashSet::new();
        for shape in shapes.entities() {
            if !seen.insert(shape.shape_id.as_str()) {
                continue;
            }
            if !trips.contains_key("shape_id", &shape.shape_id) {
                notices.push(UnusedShape {
                    filename: SHAPES_FILE,
                    csv_row_number: shape.csv_row_number(),
                    shape_id: shape.shape_id.clone(),
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
        shapes: TableContainer<ShapeRecord>,
        trips: TableContainer<TripRecord>,
    ) -> NoticeContainer {
        let snapshot = FeedSnapshot::builder()
            .table(shapes)
            .unwrap()
            .table(trips)
            .unwrap()
            .build();
        let dependencies = UnusedShapeRule.dependencies();
        let mut notices = NoticeContainer::new();
        UnusedShapeRule
            .validate(&TableSet::new(&snapshot, &dependencies), &mut notices)
            .unwrap();
        notices
    }

    #[test]
    fn test_unused_shape_reported_once() {
        let notices = run(
            shapes_table(&["A", "A", "B", "B", "B"]),
            trips_table(&[Some("A"), None]),
        );

        assert_eq!(notices.len(), 1);
        let notice = &notices.notices()[0];
        assert_eq!(notice.get("shapeId"), Some(&json!("B")));
        assert_eq!(notice.get("csvRowNumber"), Some(&json!(4)));
        assert_eq!(notice.severity(), Severity::Warning);
    }

    #[test]
    fn test_every_unused_shape_in_row_order() {
        let notices = run(shapes_table(&["C", "A", "C", "B"]), trips_table(&[Some("A")]));
        let ids: Vec<_> = notices
            .notices()
            .iter()
            .map(|n| n.get("shapeId").cloned().unwrap())
            .collect();
        assert_eq!(ids, vec![json!("C"), json!("B")]);
    }

    #[test]
    fn test_missing_trips_file_is_silent() {
        let notices = run(shapes_table(&["A"]), TableContainer::missing());
        assert!(notices.is_empty());
    }
}
