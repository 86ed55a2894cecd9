//! `calendar.txt` rows.

use crate::table::{Record, TableId};
use chrono::NaiveDate;

/// A weekly service pattern with its validity range.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarRecord {
    csv_row_number: u64,
    /// Identifies the set of dates the service runs.
    pub service_id: String,
    /// First day of the service interval.
    pub start_date: Option<NaiveDate>,
    /// Last day of the service interval, inclusive.
    pub end_date: Option<NaiveDate>,
}

impl CalendarRecord {
    /// Creates a row with no dates set.
    pub fn new(csv_row_number: u64, service_id: impl Into<String>) -> Self {
        Self {
            csv_row_number,
            service_id: service_id.into(),
            start_date: None,
            end_date: None,
        }
    }

    /// Sets both ends of the service interval.
    pub fn with_range(mut self, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self.end_date = Some(end_date);
        self
    }

    /// True if `start_date` is set.
    pub fn has_start_date(&self) -> bool {
        self.start_date.is_some()
    }

    /// True if `end_date` is set.
    pub fn has_end_date(&self) -> bool {
        self.end_date.is_some()
    }
}

impl Record for CalendarRecord {
    const TABLE: TableId = TableId::new(super::CALENDAR_FILE);
    const INDEXED_FIELDS: &'static [&'static str] = &["service_id"];

    fn csv_row_number(&self) -> u64 {
        self.csv_row_number
    }

    fn index_key(&self, field: &str) -> Option<&str> {
        match field {
            "service_id" => Some(&self.service_id),
            _ => None,
        }
    }
}
