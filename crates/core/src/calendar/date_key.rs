//! Canonical calendar-day keys and month ranges.
//!
//! A key is always taken from the local calendar fields of a date in the
//! user's time zone. Keys are never derived through a UTC conversion, which
//! would shift entries made near midnight onto the neighbouring day.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::error::CalendarError;

const KEY_FORMAT: &str = "%Y-%m-%d";

/// Years a key or month may name: exactly four digits.
const YEARS: RangeInclusive<i32> = 1000..=9999;

/// A calendar day with no time-of-day, rendered as `YYYY-MM-DD`.
///
/// This is the bucketing key for all aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalDateKey(NaiveDate);

impl LocalDateKey {
    /// Wraps a calendar date.
    #[must_use]
    pub const fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Builds a key from year, 1-indexed month and day.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, CalendarError> {
        if !YEARS.contains(&year) {
            return Err(CalendarError::InvalidYear(year));
        }
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| CalendarError::InvalidDateKey(format!("{year:04}-{month:02}-{day:02}")))
    }

    /// Returns the calendar date.
    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }

    /// Returns the month this day belongs to.
    #[must_use]
    pub fn month(self) -> MonthRef {
        MonthRef::containing(self.0)
    }
}

impl fmt::Display for LocalDateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(KEY_FORMAT))
    }
}

impl FromStr for LocalDateKey {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // chrono accepts unpadded fields; keys are always zero-padded.
        if s.len() != 10 {
            return Err(CalendarError::InvalidDateKey(s.to_string()));
        }
        let date = NaiveDate::parse_from_str(s, KEY_FORMAT)
            .map_err(|_| CalendarError::InvalidDateKey(s.to_string()))?;
        if !YEARS.contains(&date.year()) {
            return Err(CalendarError::InvalidYear(date.year()));
        }
        Ok(Self(date))
    }
}

/// Produces the key of the local calendar day of `instant`.
///
/// Only the date fields in the instant's own time zone are used, so two
/// instants on the same local day always share a key.
#[must_use]
pub fn to_local_key<Z: TimeZone>(instant: &DateTime<Z>) -> LocalDateKey {
    LocalDateKey(instant.date_naive())
}

/// Produces the key of the day `instant` falls on in `tz`.
#[must_use]
pub fn to_local_key_in(instant: DateTime<Utc>, tz: Tz) -> LocalDateKey {
    to_local_key(&instant.with_timezone(&tz))
}

/// Returns the first and last day keys of a 1-indexed month.
pub fn month_range(year: i32, month: u32) -> Result<(LocalDateKey, LocalDateKey), CalendarError> {
    Ok(MonthRef::new(year, month)?.range())
}

/// A validated calendar month (4-digit year, month 1-12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthRef {
    first: NaiveDate,
}

impl MonthRef {
    /// Creates a month reference.
    pub fn new(year: i32, month: u32) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth(month));
        }
        if !YEARS.contains(&year) {
            return Err(CalendarError::InvalidYear(year));
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| Self { first })
            .ok_or(CalendarError::InvalidMonth(month))
    }

    fn containing(date: NaiveDate) -> Self {
        Self {
            first: date - Days::new(u64::from(date.day0())),
        }
    }

    /// Returns the year.
    #[must_use]
    pub fn year(self) -> i32 {
        self.first.year()
    }

    /// Returns the 1-indexed month.
    #[must_use]
    pub fn month(self) -> u32 {
        self.first.month()
    }

    /// Returns the first day of the month.
    #[must_use]
    pub const fn first_day(self) -> LocalDateKey {
        LocalDateKey(self.first)
    }

    /// Returns the last day of the month.
    #[must_use]
    pub fn last_day(self) -> LocalDateKey {
        LocalDateKey(self.first + Months::new(1) - Days::new(1))
    }

    /// Returns `(first_day, last_day)`, both inclusive.
    #[must_use]
    pub fn range(self) -> (LocalDateKey, LocalDateKey) {
        (self.first_day(), self.last_day())
    }

    /// Number of days in the month.
    #[must_use]
    pub fn days_in_month(self) -> u32 {
        self.last_day().date().day()
    }

    /// Returns true if the day falls inside this month.
    #[must_use]
    pub fn contains(self, key: LocalDateKey) -> bool {
        let (first, last) = self.range();
        first <= key && key <= last
    }

    /// English month name, e.g. `October`.
    #[must_use]
    pub fn name(self) -> String {
        self.first.format("%B").to_string()
    }

    /// The following month.
    pub fn next(self) -> Result<Self, CalendarError> {
        let next = self.first + Months::new(1);
        Self::new(next.year(), next.month())
    }

    /// The preceding month.
    pub fn previous(self) -> Result<Self, CalendarError> {
        let previous = self.first - Months::new(1);
        Self::new(previous.year(), previous.month())
    }
}

impl fmt::Display for MonthRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first.format("%Y-%m"))
    }
}
