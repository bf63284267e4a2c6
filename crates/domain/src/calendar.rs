// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Calendar predicates and date windows.
//!
//! Workdays are Monday through Friday, minus any date in the holiday set.
//! These predicates are pure and constant time.

use crate::error::DomainError;
use crate::holiday::Holiday;
use serde::Serialize;
use std::collections::HashSet;
use time::{Date, Weekday};

/// Whether the date falls on Saturday or Sunday.
#[must_use]
pub const fn is_weekend(date: Date) -> bool {
    matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday)
}

/// Whether the date is a weekend or a holiday.
#[must_use]
pub fn is_non_workday(date: Date, holidays: &HolidaySet) -> bool {
    is_weekend(date) || holidays.contains(date)
}

/// The set of holiday dates the engine skips.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidaySet {
    dates: HashSet<Date>,
}

impl HolidaySet {
    /// Creates an empty holiday set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from a holiday feed. Only the date is retained.
    #[must_use]
    pub fn from_holidays(holidays: &[Holiday]) -> Self {
        holidays.iter().map(|h| h.date).collect()
    }

    /// Whether the date is a holiday.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.dates.contains(&date)
    }

    /// Adds a date to the set.
    pub fn insert(&mut self, date: Date) {
        self.dates.insert(date);
    }

    /// Number of distinct holiday dates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the set has no dates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl FromIterator<Date> for HolidaySet {
    fn from_iter<I: IntoIterator<Item = Date>>(iter: I) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}

/// An inclusive window of calendar dates.
///
/// ## Invariants
///
/// - `end >= start`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    #[serde(with = "crate::date_format::iso_date")]
    start: Date,
    #[serde(with = "crate::date_format::iso_date")]
    end: Date,
}

impl DateRange {
    /// Creates a validated date range.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDateRange` if `end` is before `start`.
    pub fn new(start: Date, end: Date) -> Result<Self, DomainError> {
        if end < start {
            return Err(DomainError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A range from `start` through December 31 of the same year.
    #[must_use]
    pub fn through_end_of_year(start: Date) -> Self {
        let end: Date = Date::from_calendar_date(start.year(), time::Month::December, 31)
            .unwrap_or(start);
        Self { start, end }
    }

    /// Every date of a calendar year.
    ///
    /// # Errors
    ///
    /// Returns an error if the year is outside the supported date range.
    pub fn year(year: i32) -> Result<Self, DomainError> {
        let start: Date = Date::from_calendar_date(year, time::Month::January, 1).map_err(|e| {
            DomainError::DateArithmeticOverflow {
                operation: format!("computing January 1 of {year}: {e}"),
            }
        })?;
        Ok(Self::through_end_of_year(start))
    }

    /// First date of the range.
    #[must_use]
    pub const fn start(&self) -> Date {
        self.start
    }

    /// Last date of the range.
    #[must_use]
    pub const fn end(&self) -> Date {
        self.end
    }

    /// Whether the date lies inside the range.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered, inclusive.
    #[must_use]
    pub fn days(&self) -> i64 {
        (self.end - self.start).whole_days() + 1
    }

    /// Iterates the range one day at a time in ascending order.
    #[must_use]
    pub const fn iter(&self) -> DateRangeIter {
        DateRangeIter {
            next: Some(self.start),
            end: self.end,
        }
    }
}

impl IntoIterator for DateRange {
    type Item = Date;
    type IntoIter = DateRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for &DateRange {
    type Item = Date;
    type IntoIter = DateRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Day-by-day iterator over a [`DateRange`].
#[derive(Debug, Clone)]
pub struct DateRangeIter {
    next: Option<Date>,
    end: Date,
}

impl Iterator for DateRangeIter {
    type Item = Date;

    fn next(&mut self) -> Option<Self::Item> {
        let current: Date = self.next.filter(|d| *d <= self.end)?;
        self.next = current.next_day();
        Some(current)
    }
}
