//! `shapes.txt` rows.

use crate::table::{Record, TableId};

/// One point of a vehicle travel path.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeRecord {
    csv_row_number: u64,
    /// Identifies the shape the point belongs to.
    pub shape_id: String,
    /// Order of the point along the shape.
    pub shape_pt_sequence: u32,
    /// Latitude of the point.
    pub shape_pt_lat: Option<f64>,
    /// Longitude of the point.
    pub shape_pt_lon: Option<f64>,
}

impl ShapeRecord {
    /// Creates a point without coordinates.
    pub fn new(csv_row_number: u64, shape_id: impl Into<String>, shape_pt_sequence: u32) -> Self {
        Self {
            csv_row_number,
            shape_id: shape_id.into(),
            shape_pt_sequence,
            shape_pt_lat: None,
            shape_pt_lon: None,
        }
    }

    /// Sets the point's coordinates.
    pub fn with_position(mut self, lat: f64, lon: f64) -> Self {
        self.shape_pt_lat = Some(lat);
        self.shape_pt_lon = Some(lon);
        self
    }
}

impl Record for ShapeRecord {
    const TABLE: TableId = TableId::new(super::SHAPES_FILE);
    const INDEXED_FIELDS: &'static [&'static str] = &["shape_id"];

    fn csv_row_number(&self) -> u64 {
        self.csv_row_number
    }

    fn index_key(&self, field: &str) -> Option<&str> {
        match field {
            "shape_id" => Some(&self.shape_id),
            _ => None,
        }
    }
}
