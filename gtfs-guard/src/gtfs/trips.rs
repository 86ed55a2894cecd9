//! `trips.txt` rows.

use crate::table::{Record, TableId};

/// A trip made by a vehicle along a route.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    csv_row_number: u64,
    /// Route the trip belongs to.
    pub route_id: String,
    /// Service calendar the trip runs on.
    pub service_id: String,
    /// Identifies the trip.
    pub trip_id: String,
    /// Travel path of the trip, if one is given.
    pub shape_id: Option<String>,
}

impl TripRecord {
    /// Creates a trip without a shape.
    pub fn new(
        csv_row_number: u64,
        route_id: impl Into<String>,
        service_id: impl Into<String>,
        trip_id: impl Into<String>,
    ) -> Self {
        Self {
            csv_row_number,
            route_id: route_id.into(),
            service_id: service_id.into(),
            trip_id: trip_id.into(),
            shape_id: None,
        }
    }

    /// Sets the trip's shape.
    pub fn with_shape_id(mut self, shape_id: impl Into<String>) -> Self {
        self.shape_id = Some(shape_id.into());
        self
    }

    /// True if `shape_id` is set.
    pub fn has_shape_id(&self) -> bool {
        self.shape_id.is_some()
    }
}

impl Record for TripRecord {
    const TABLE: TableId = TableId::new(super::TRIPS_FILE);
    const INDEXED_FIELDS: &'static [&'static str] = &["trip_id", "shape_id", "service_id"];

    fn csv_row_number(&self) -> u64 {
        self.csv_row_number
    }

    fn index_key(&self, field: &str) -> Option<&str> {
        match field {
            "trip_id" => Some(&self.trip_id),
            "shape_id" => self.shape_id.as_deref(),
            "service_id" => Some(&self.service_id),
            _ => None,
        }
    }
}
