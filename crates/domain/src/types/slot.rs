//! Time slot identity
//!
//! A slot is one hour on one calendar date. Dates are plain `YYYY-MM-DD`
//! strings interpreted in the device's local time; no timezone is attached.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{DATE_FORMAT, MAX_HOUR};
use crate::errors::{HuddleError, Result};

/// Structural `(date, hour)` key joining availability and scoring.
///
/// Ordering is chronological: `YYYY-MM-DD` strings sort lexicographically in
/// date order, then by hour.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeSlotKey {
    pub date: String,
    pub hour: u32,
}

impl TimeSlotKey {
    /// Build a validated key.
    pub fn new(date: impl Into<String>, hour: u32) -> Result<Self> {
        let date = date.into();
        validate_date(&date)?;
        validate_hour(hour)?;
        Ok(Self { date, hour })
    }

    /// Build a key from a date already known to be valid.
    pub fn from_naive(date: NaiveDate, hour: u32) -> Result<Self> {
        validate_hour(hour)?;
        Ok(Self { date: date.format(DATE_FORMAT).to_string(), hour })
    }

    /// Stable identifier used by the grid, e.g. `2024-03-04T09`.
    pub fn slot_id(&self) -> String {
        format!("{}T{:02}", self.date, self.hour)
    }

    /// Calendar date of the slot.
    pub fn naive_date(&self) -> Result<NaiveDate> {
        parse_date(&self.date)
    }
}

impl fmt::Display for TimeSlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:02}:00", self.date, self.hour)
    }
}

impl FromStr for TimeSlotKey {
    type Err = HuddleError;

    /// Parses the `slot_id` form.
    fn from_str(s: &str) -> Result<Self> {
        let (date, hour) = s
            .split_once('T')
            .ok_or_else(|| HuddleError::InvalidInput(format!("malformed slot id: {s}")))?;
        let hour = hour
            .parse::<u32>()
            .map_err(|_| HuddleError::InvalidInput(format!("malformed slot hour: {s}")))?;
        Self::new(date, hour)
    }
}

/// Plain-data projection of a single slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotEntry {
    pub date: String,
    pub hour: u32,
    pub available: bool,
}

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_date(date: &str) -> Result<NaiveDate> {
    // chrono accepts unpadded fields; the stored form must be canonical
    if date.len() != 10 {
        return Err(HuddleError::InvalidInput(format!("date must be YYYY-MM-DD: {date}")));
    }
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|e| HuddleError::InvalidInput(format!("invalid date {date}: {e}")))
}

/// Check a `YYYY-MM-DD` date string.
pub fn validate_date(date: &str) -> Result<()> {
    parse_date(date).map(|_| ())
}

/// Check an hour is within `0..=23`.
pub fn validate_hour(hour: u32) -> Result<()> {
    if hour > MAX_HOUR {
        return Err(HuddleError::InvalidInput(format!("hour out of range 0-{MAX_HOUR}: {hour}")));
    }
    Ok(())
}
