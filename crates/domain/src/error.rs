// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Date;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Person identifier is empty or malformed.
    #[error("Invalid person id: {0}")]
    InvalidPersonId(String),
    /// Person display name is empty.
    #[error("Invalid name: {0}")]
    InvalidName(String),
    /// The same person id appears more than once in a roster.
    #[error("Person '{0}' appears more than once in the roster")]
    DuplicatePerson(String),
    /// The roster does not contain exactly one fixed person.
    #[error("Roster must contain exactly one fixed person, found {count}")]
    InvalidFixedCount {
        /// Number of fixed persons found.
        count: usize,
    },
    /// The rotating pool has no members.
    #[error("Rotating pool is empty")]
    EmptyPool,
    /// The configured substitute is not a member of the rotating pool.
    #[error("Substitute '{0}' is not a member of the rotating pool")]
    SubstituteNotInPool(String),
    /// A date window ends before it starts.
    #[error("Invalid date range: end {end} is before start {start}")]
    InvalidDateRange {
        /// The window start.
        start: Date,
        /// The window end.
        end: Date,
    },
    /// An absence interval has a non-positive length.
    #[error("Absence for '{person_id}' starting {start} has non-positive length {length_days}")]
    InvalidAbsenceLength {
        /// The person the absence belongs to.
        person_id: String,
        /// The interval start.
        start: Date,
        /// The rejected length.
        length_days: i32,
    },
    /// Two absence intervals of the same person overlap.
    #[error(
        "Absence for '{person_id}' starting {second_start} overlaps the absence starting {first_start}"
    )]
    OverlappingAbsence {
        /// The person both intervals belong to.
        person_id: String,
        /// Start of the earlier interval.
        first_start: Date,
        /// Start of the overlapping interval.
        second_start: Date,
    },
    /// A status string could not be parsed.
    #[error("Invalid status kind: {0}")]
    InvalidStatusKind(String),
    /// A role string could not be parsed.
    #[error("Invalid role: {0}")]
    InvalidRole(String),
    /// A holiday category string could not be parsed.
    #[error("Invalid holiday category: {0}")]
    InvalidHolidayCategory(String),
    /// An assignment id could not be parsed.
    #[error("Invalid assignment id: {0}")]
    InvalidAssignmentId(String),
    /// Failed to parse a date from a string.
    #[error("Failed to parse date '{date_string}': {error}")]
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Date arithmetic overflow.
    #[error("Date arithmetic overflow while {operation}")]
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// Continuity lookback is outside the accepted range.
    #[error("Lookback must be between 1 and 366 days, got {0}")]
    InvalidLookback(u32),
    /// A recurring holiday names a month and day that never exist.
    #[error("Invalid recurring holiday date: month {month}, day {day}")]
    InvalidRecurringHoliday {
        /// The configured month.
        month: u8,
        /// The configured day.
        day: u8,
    },
    /// Timezone name is not a known IANA zone.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}
