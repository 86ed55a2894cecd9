//! Rules bundled with gtfs-guard.
//!
//! Each rule covers one pattern a catalogue of GTFS rules is built from:
//!
//! | Rule | Shape | Pattern |
//! |------|-------|---------|
//! | [`CalendarRangeRule`] | per record | inclusive start/end ordering |
//! | [`FareProductAmountRule`] | per record | numeric precision against a lookup table |
//! | [`ForbiddenPickupTypeRule`] | per record, gated | enum subset behind an optional column |
//! | [`TripShapeReferenceRule`] | whole table | cross-table foreign key through an index |
//! | [`UnusedShapeRule`] | whole table | unused references, deduplicated by key |
//! | [`RequiredTablesRule`] | whole table | absent versus empty files |

mod calendar_range;
mod fare_product_amount;
mod forbidden_pickup_type;
mod required_tables;
mod trip_shape_reference;
mod unused_shape;

pub use calendar_range::{CalendarRangeRule, StartAndEndRangeOutOfOrder};
pub use fare_product_amount::{currency_minor_units, FareProductAmountRule, InvalidCurrencyAmount};
pub use forbidden_pickup_type::{ForbiddenPickupType, ForbiddenPickupTypeRule};
pub use required_tables::{EmptyFile, MissingRequiredFile, RequiredTablesRule};
pub use trip_shape_reference::{ForeignKeyViolation, TripShapeReferenceRule};
pub use unused_shape::{UnusedShape, UnusedShapeRule};

use crate::core::RuleRegistry;
use crate::error::Result;

/// A registry holding every bundled rule.
///
/// Whole-table rules come first so file-level findings lead the report.
pub fn default_registry() -> Result<RuleRegistry> {
    RuleRegistry::builder()
        .file_rule_with(RequiredTablesRule::default)
        .file_rule(TripShapeReferenceRule)
        .file_rule(UnusedShapeRule)
        .record_rule(CalendarRangeRule)
        .record_rule(FareProductAmountRule)
        .record_rule(ForbiddenPickupTypeRule)
        .build()
}
