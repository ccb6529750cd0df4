//! Quarter-shaped epoch labels and their deterministic timestamps.
//!
//! Reproducible vectors need a `created_at` that does not depend on the wall
//! clock. Labels of the form `YYYY-Qn` map to 00:00:00 UTC on the first day
//! of the quarter.

use crate::error::{IdentityError, Result};
use chrono::{TimeZone, Utc};
use std::fmt;
use std::str::FromStr;

/// A `<4-digit year>-Q<1-4>` epoch label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuarterLabel {
    year: u16,
    quarter: u8,
}

impl QuarterLabel {
    pub fn new(year: u16, quarter: u8) -> Result<Self> {
        let label = format!("{year:04}-Q{quarter}");
        if !(1..=4).contains(&quarter) {
            return Err(invalid(&label, "quarter must be 1..4"));
        }
        if !(1..=9999).contains(&year) {
            return Err(invalid(&label, "year must be 0001..9999"));
        }
        Ok(Self { year, quarter })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn quarter(&self) -> u8 {
        self.quarter
    }

    /// First month of the quarter: 1, 4, 7 or 10.
    pub fn first_month(&self) -> u32 {
        u32::from(self.quarter - 1) * 3 + 1
    }

    /// Unix seconds at the start of the quarter.
    pub fn start_timestamp(&self) -> Result<i64> {
        Utc.with_ymd_and_hms(i32::from(self.year), self.first_month(), 1, 0, 0, 0)
            .single()
            .map(|dt| dt.timestamp())
            .ok_or_else(|| invalid(&self.to_string(), "date out of range"))
    }
}

impl FromStr for QuarterLabel {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self> {
        let (year, quarter) = s
            .split_once("-Q")
            .ok_or_else(|| invalid(s, "expected YYYY-Qn"))?;

        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid(s, "year must have four digits"));
        }
        if quarter.len() != 1 || !quarter.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid(s, "quarter must be 1..4"));
        }

        let year = year.parse().map_err(|_| invalid(s, "year must have four digits"))?;
        let quarter = quarter.parse().map_err(|_| invalid(s, "quarter must be 1..4"))?;
        Self::new(year, quarter)
    }
}

impl fmt::Display for QuarterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-Q{}", self.year, self.quarter)
    }
}

/// Deterministic `created_at` for a quarter label.
pub fn deterministic_created_at(label: &str) -> Result<i64> {
    label.parse::<QuarterLabel>()?.start_timestamp()
}

fn invalid(label: &str, reason: &'static str) -> IdentityError {
    IdentityError::InvalidEpochLabel {
        label: label.to_string(),
        reason,
    }
}
