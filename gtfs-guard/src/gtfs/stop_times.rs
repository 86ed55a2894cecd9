//! `stop_times.txt` rows.

use super::types::{GtfsTime, PickupDropOffType};
use crate::table::{Record, TableId};

/// A scheduled visit of a trip at a stop or flexible zone.
#[derive(Debug, Clone, PartialEq)]
pub struct StopTimeRecord {
    csv_row_number: u64,
    /// Trip the visit belongs to.
    pub trip_id: String,
    /// Order of the visit within the trip.
    pub stop_sequence: u32,
    /// Pickup method.
    pub pickup_type: Option<PickupDropOffType>,
    /// Drop-off method.
    pub drop_off_type: Option<PickupDropOffType>,
    /// Start of a flexible service window.
    pub start_pickup_drop_off_window: Option<GtfsTime>,
    /// End of a flexible service window.
    pub end_pickup_drop_off_window: Option<GtfsTime>,
}

impl StopTimeRecord {
    /// Creates a visit with every optional field unset.
    pub fn new(csv_row_number: u64, trip_id: impl Into<String>, stop_sequence: u32) -> Self {
        Self {
            csv_row_number,
            trip_id: trip_id.into(),
            stop_sequence,
            pickup_type: None,
            drop_off_type: None,
            start_pickup_drop_off_window: None,
            end_pickup_drop_off_window: None,
        }
    }

    /// Sets the pickup method.
    pub fn with_pickup_type(mut self, pickup_type: PickupDropOffType) -> Self {
        self.pickup_type = Some(pickup_type);
        self
    }

    /// Sets the flexible service window.
    pub fn with_window(mut self, start: GtfsTime, end: GtfsTime) -> Self {
        self.start_pickup_drop_off_window = Some(start);
        self.end_pickup_drop_off_window = Some(end);
        self
    }

    /// True if `start_pickup_drop_off_window` is set.
    pub fn has_start_pickup_drop_off_window(&self) -> bool {
        self.start_pickup_drop_off_window.is_some()
    }

    /// True if `end_pickup_drop_off_window` is set.
    pub fn has_end_pickup_drop_off_window(&self) -> bool {
        self.end_pickup_drop_off_window.is_some()
    }
}

impl Record for StopTimeRecord {
    const TABLE: TableId = TableId::new(super::STOP_TIMES_FILE);
    const INDEXED_FIELDS: &'static [&'static str] = &["trip_id"];

    fn csv_row_number(&self) -> u64 {
        self.csv_row_number
    }

    fn index_key(&self, field: &str) -> Option<&str> {
        match field {
            "trip_id" => Some(&self.trip_id),
            _ => None,
        }
    }
}
