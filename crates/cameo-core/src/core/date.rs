// crates/cameo-core/src/core/date.rs
// ============================================================================
// Module: Coding Dates
// Description: Calendar dates and half-open validity intervals.
// Purpose: Resolve date-restricted codes without ambiguity at boundaries.
// Dependencies: serde, thiserror, time
// ============================================================================

//! ## Overview
//! Codes can change over time (Fatah is `PALPLO` before September 1993 and
//! `PSEGOVFTA` from then on). A [`DateRestriction`] is the half-open interval
//! `[from, until)`, so two consecutive restrictions that share a boundary
//! date never both admit it. Dates are written `YYYY-MM-DD`; the short form
//! `YYYY-MM` means the first of that month.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use thiserror::Error;
use time::Date;
use time::Month;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Date parsing and interval construction failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    /// Text is not `YYYY-MM-DD` or `YYYY-MM`.
    #[error("invalid date {0:?}: expected YYYY-MM-DD or YYYY-MM")]
    Format(String),
    /// Interval ends at or before it starts.
    #[error("empty date range: {from} is not before {until}")]
    EmptyRange {
        /// Inclusive start.
        from: CodingDate,
        /// Exclusive end.
        until: CodingDate,
    },
}

// ============================================================================
// SECTION: Dates
// ============================================================================

/// Calendar date used for code validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CodingDate(Date);

impl CodingDate {
    /// Wraps a `time::Date`.
    #[must_use]
    pub const fn new(date: Date) -> Self {
        Self(date)
    }

    /// Builds a date from calendar parts, returning `None` when invalid.
    #[must_use]
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Option<Self> {
        let month = Month::try_from(month).ok()?;
        Date::from_calendar_date(year, month, day).ok().map(Self)
    }

    /// Parses `YYYY-MM-DD` or `YYYY-MM`.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::Format`] for any other shape or an impossible date.
    pub fn parse(text: &str) -> Result<Self, DateError> {
        parse_parts(text.trim()).ok_or_else(|| DateError::Format(text.to_string()))
    }

    /// Returns the underlying `time::Date`.
    #[must_use]
    pub const fn as_date(self) -> Date {
        self.0
    }
}

/// Splits and range-checks date parts; the day defaults to the first.
fn parse_parts(text: &str) -> Option<CodingDate> {
    let mut parts = text.split('-');
    let year_text = parts.next()?;
    if year_text.len() != 4 {
        return None;
    }
    let year: i32 = year_text.parse().ok()?;
    let month: u8 = parts.next()?.parse().ok()?;
    let day: u8 = match parts.next() {
        Some(day) => day.parse().ok()?,
        None => 1,
    };
    if parts.next().is_some() {
        return None;
    }
    CodingDate::from_ymd(year, month, day)
}

impl fmt::Display for CodingDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

impl FromStr for CodingDate {
    type Err = DateError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl Serialize for CodingDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CodingDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// SECTION: Restrictions
// ============================================================================

/// Half-open validity interval `[from, until)`; a missing bound is open.
///
/// # Invariants
/// - When both bounds are present, `from < until`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRestriction {
    /// First valid date, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    from: Option<CodingDate>,
    /// First date no longer valid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    until: Option<CodingDate>,
}

impl DateRestriction {
    /// Interval with neither bound.
    pub const UNBOUNDED: Self = Self {
        from: None,
        until: None,
    };

    /// Creates an interval.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::EmptyRange`] when `until` is not after `from`.
    pub fn new(from: Option<CodingDate>, until: Option<CodingDate>) -> Result<Self, DateError> {
        if let (Some(from), Some(until)) = (from, until)
            && until <= from
        {
            return Err(DateError::EmptyRange {
                from,
                until,
            });
        }
        Ok(Self {
            from,
            until,
        })
    }

    /// Interval starting at `from` with no end.
    #[must_use]
    pub const fn starting(from: CodingDate) -> Self {
        Self {
            from: Some(from),
            until: None,
        }
    }

    /// Interval ending before `until` with no start.
    #[must_use]
    pub const fn ending(until: CodingDate) -> Self {
        Self {
            from: None,
            until: Some(until),
        }
    }

    /// Returns the inclusive start.
    #[must_use]
    pub const fn from(&self) -> Option<CodingDate> {
        self.from
    }

    /// Returns the exclusive end.
    #[must_use]
    pub const fn until(&self) -> Option<CodingDate> {
        self.until
    }

    /// Returns true when neither bound is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.until.is_none()
    }

    /// Returns true when `date` lies in the interval.
    #[must_use]
    pub fn contains(&self, date: CodingDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.until.is_none_or(|until| date < until)
    }

    /// Returns true when the two intervals share at least one date.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let starts_before_other_ends = match (self.from, other.until) {
            (Some(from), Some(until)) => from < until,
            _ => true,
        };
        let other_starts_before_end = match (other.from, self.until) {
            (Some(from), Some(until)) => from < until,
            _ => true,
        };
        starts_before_other_ends && other_starts_before_end
    }

    /// Returns the common part of two intervals, or `None` when disjoint.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let from = self.from.max(other.from);
        let until = match (self.until, other.until) {
            (Some(left), Some(right)) => Some(left.min(right)),
            (left, right) => left.or(right),
        };
        Self::new(from, until).ok()
    }
}

impl fmt::Display for DateRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.from, self.until) {
            (None, None) => f.write_str(".."),
            (Some(from), None) => write!(f, "{from}.."),
            (None, Some(until)) => write!(f, "..{until}"),
            (Some(from), Some(until)) => write!(f, "{from}..{until}"),
        }
    }
}
