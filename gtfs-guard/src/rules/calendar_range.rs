//! Start/end ordering of `calendar.txt` service ranges.

use crate::core::{NoticeContainer, NoticeKind, RecordRule, Severity};
use crate::error::RuleFault;
use crate::gtfs::{CalendarRecord, CALENDAR_FILE};
use crate::table::Record;
use chrono::NaiveDate;
use serde::Serialize;

/// A service range ends before it starts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartAndEndRangeOutOfOrder {
    pub filename: &'static str,
    pub csv_row_number: u64,
    pub service_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl NoticeKind for StartAndEndRangeOutOfOrder {
    const CODE: &'static str = "start_and_end_range_out_of_order";
    const SEVERITY: Severity = Severity::Error;
}

/// Flags calendar rows whose `start_date` is after their `end_date`.
///
/// Equal dates describe a one-day service and are valid. Rows missing either
/// date are left to the required-field checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarRangeRule;

impl RecordRule for CalendarRangeRule {
    type Record = CalendarRecord;

    fn name(&self) -> &str {
        "calendar_range"
    }

    fn validate(
        &self,
        record: &CalendarRecord,
        notices: &mut NoticeContainer,
    ) -> Result<(), RuleFault> {
        let (Some(start_date), Some(end_date)) = (record.start_date, record.end_date) else {
            return Ok(());
        };
        if start_date > end_date {
            notices.push(StartAndEndRangeOutOfOrder {
                filename: CALENDAR_FILE,
                csv_row_number: record.csv_row_number(),
                service_id: record.service_id.clone(),
                start_date,
                end_date,
            });
        }
        Ok(())
    }
}
