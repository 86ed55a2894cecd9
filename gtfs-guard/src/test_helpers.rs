//! Fixtures shared by unit tests.

use crate::gtfs::{CalendarRecord, FareProductRecord, ShapeRecord, StopTimeRecord, TripRecord};
use crate::table::TableContainer;
use chrono::NaiveDate;

/// Row number of the first data row; the header is row 1.
pub const FIRST_ROW: u64 = 2;

/// Builds a date, panicking on an invalid one.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// A parsed `calendar.txt` with the standard date columns.
pub fn calendar_table(rows: Vec<CalendarRecord>) -> TableContainer<CalendarRecord> {
    TableContainer::from_rows(["service_id", "start_date", "end_date"], rows)
}

/// A parsed `shapes.txt` with one point per listed shape id.
pub fn shapes_table(shape_ids: &[&str]) -> TableContainer<ShapeRecord> {
    let rows = shape_ids
        .iter()
        .zip(FIRST_ROW..)
        .enumerate()
        .map(|(i, (id, row))| ShapeRecord::new(row, *id, i as u32 + 1))
        .collect();
    TableContainer::from_rows(["shape_id", "shape_pt_sequence"], rows)
}

/// A parsed `trips.txt`, one trip per entry, referencing the given shapes.
pub fn trips_table(shape_ids: &[Option<&str>]) -> TableContainer<TripRecord> {
    let rows = shape_ids
        .iter()
        .zip(FIRST_ROW..)
        .map(|(shape_id, row)| {
            let trip = TripRecord::new(row, "r1", "weekday", format!("t{row}"));
            match shape_id {
                Some(id) => trip.with_shape_id(*id),
                None => trip,
            }
        })
        .collect();
    TableContainer::from_rows(["route_id", "service_id", "trip_id", "shape_id"], rows)
}

/// A parsed `fare_products.txt`.
pub fn fare_products_table(rows: Vec<FareProductRecord>) -> TableContainer<FareProductRecord> {
    TableContainer::from_rows(["fare_product_id", "amount", "currency"], rows)
}

/// A parsed `stop_times.txt` declaring the given columns.
pub fn stop_times_table(
    columns: &[&str],
    rows: Vec<StopTimeRecord>,
) -> TableContainer<StopTimeRecord> {
    TableContainer::from_rows(columns.iter().copied(), rows)
}
