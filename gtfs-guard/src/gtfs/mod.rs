//! Typed GTFS records for the tables the bundled rules read.
//!
//! The decoding layer that fills these from CSV text lives outside this
//! crate; the types here only describe the decoded shape of each row.

mod calendar;
mod fare_products;
mod shapes;
mod stop_times;
mod trips;
mod types;

pub use calendar::CalendarRecord;
pub use fare_products::FareProductRecord;
pub use shapes::ShapeRecord;
pub use stop_times::StopTimeRecord;
pub use trips::TripRecord;
pub use types::{GtfsDecimal, GtfsTime, PickupDropOffType};

pub const CALENDAR_FILE: &str = "calendar.txt";
pub const FARE_PRODUCTS_FILE: &str = "fare_products.txt";
pub const SHAPES_FILE: &str = "shapes.txt";
pub const STOP_TIMES_FILE: &str = "stop_times.txt";
pub const TRIPS_FILE: &str = "trips.txt";
