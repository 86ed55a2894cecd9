//! Pickup types that flexible service windows do not allow.

use crate::core::{NoticeContainer, NoticeKind, RecordRule, Severity};
use crate::error::RuleFault;
use crate::gtfs::{GtfsTime, PickupDropOffType, StopTimeRecord, STOP_TIMES_FILE};
use crate::table::{ColumnInspector, Record};
use serde::Serialize;

/// A stop time with a pickup/drop-off window uses a forbidden pickup type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForbiddenPickupType {
    pub filename: &'static str,
    pub csv_row_number: u64,
    pub pickup_type: PickupDropOffType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_pickup_drop_off_window: Option<GtfsTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_pickup_drop_off_window: Option<GtfsTime>,
}

impl NoticeKind for ForbiddenPickupType {
    const CODE: &'static str = "forbidden_pickup_type";
    const SEVERITY: Severity = Severity::Error;
}

/// Within a pickup/drop-off window, `pickup_type` must not be regular (0) or
/// coordinated with the driver (3).
///
/// The rule only applies to feeds using flexible service, so it is gated on
/// the `start_pickup_drop_off_window` column.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForbiddenPickupTypeRule;

impl RecordRule for ForbiddenPickupTypeRule {
    type Record = StopTimeRecord;

    fn name(&self) -> &str {
        "forbidden_pickup_type"
    }

    fn should_call_validate(&self, columns: &dyn ColumnInspector) -> bool {
        columns.has_column("start_pickup_drop_off_window")
    }

    fn validate(
        &self,
        record: &StopTimeRecord,
        notices: &mut NoticeContainer,
    ) -> Result<(), RuleFault> {
        if !record.has_start_pickup_drop_off_window() && !record.has_end_pickup_drop_off_window() {
            return Ok(());
        }
        let Some(pickup_type) = record.pickup_type else {
            return Ok(());
        };
        if matches!(
            pickup_type,
            PickupDropOffType::Regular | PickupDropOffType::MustCoordinateWithDriver
        ) {
            notices.push(ForbiddenPickupType {
                filename: STOP_TIMES_FILE,
                csv_row_number: record.csv_row_number(),
                pickup_type,
                start_pickup_drop_off_window: record.start_pickup_drop_off_window,
                end_pickup_drop_off_window: record.end_pickup_drop_off_window,
            });
        }
        Ok(())
    }
}
