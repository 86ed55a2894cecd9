//! Value types shared by GTFS records.

use crate::error::GuardError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

static DECIMAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[+-]?(\d+)(?:\.(\d+))?$").expect("Hard-coded regex pattern should be valid")
});

/// A decimal value that remembers how it was written.
///
/// Monetary amounts are validated against the number of fraction digits the
/// feed used, so the textual scale is kept alongside the value: `"1.50"` has
/// scale 2 even though it equals `1.5`.
#[derive(Debug, Clone, PartialEq)]
pub struct GtfsDecimal {
    raw: String,
    scale: u32,
}

impl GtfsDecimal {
    /// Number of digits after the decimal point as written.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// The value as written in the feed.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Approximate numeric value.
    pub fn to_f64(&self) -> f64 {
        // The regex guarantees a well-formed number.
        self.raw.parse().unwrap_or(f64::NAN)
    }
}

impl FromStr for GtfsDecimal {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let captures = DECIMAL_REGEX
            .captures(trimmed)
            .ok_or_else(|| GuardError::Parse(format!("'{s}' is not a decimal number")))?;
        let scale = captures.get(2).map_or(0, |fraction| fraction.len() as u32);
        Ok(Self {
            raw: trimmed.to_string(),
            scale,
        })
    }
}

impl fmt::Display for GtfsDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for GtfsDecimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// A GTFS service time, in seconds since noon minus 12h.
///
/// Hours may exceed 23 for trips running past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GtfsTime(u32);

impl GtfsTime {
    /// Creates a time from seconds since the start of the service day.
    pub fn from_seconds(seconds: u32) -> Self {
        Self(seconds)
    }

    /// Seconds since the start of the service day.
    pub fn seconds(&self) -> u32 {
        self.0
    }
}

impl FromStr for GtfsTime {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GuardError::Parse(format!("'{s}' is not a valid time; HH:MM:SS expected"));
        let mut parts = s.trim().split(':');
        let mut next = || -> Result<u32, GuardError> {
            parts
                .next()
                .and_then(|p| p.parse::<u32>().ok())
                .ok_or_else(invalid)
        };
        let (hours, minutes, seconds) = (next()?, next()?, next()?);
        if minutes > 59 || seconds > 59 || parts.next().is_some() {
            return Err(invalid());
        }
        hours
            .checked_mul(3600)
            .and_then(|h| h.checked_add(minutes * 60 + seconds))
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for GtfsTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s) = (self.0 / 3600, self.0 / 60 % 60, self.0 % 60);
        write!(f, "{h:02}:{m:02}:{s:02}")
    }
}

impl Serialize for GtfsTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Pickup or drop-off method at a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickupDropOffType {
    /// Regularly scheduled.
    Regular,
    /// Not available.
    NoPickupDropOff,
    /// Must phone the agency to arrange.
    MustPhone,
    /// Must coordinate with the driver.
    MustCoordinateWithDriver,
}

impl PickupDropOffType {
    /// Decodes the GTFS numeric value.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Regular),
            1 => Some(Self::NoPickupDropOff),
            2 => Some(Self::MustPhone),
            3 => Some(Self::MustCoordinateWithDriver),
            _ => None,
        }
    }

    /// The GTFS numeric value.
    pub fn code(&self) -> i32 {
        match self {
            Self::Regular => 0,
            Self::NoPickupDropOff => 1,
            Self::MustPhone => 2,
            Self::MustCoordinateWithDriver => 3,
        }
    }
}

impl Serialize for PickupDropOffType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.code())
    }
}
