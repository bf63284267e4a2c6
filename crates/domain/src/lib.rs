// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod absence;
mod calendar;
mod clock;
mod date_format;
mod error;
mod holiday;
mod roster;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use absence::{AbsenceCalendar, AbsenceInterval, validate_no_overlap};
pub use calendar::{DateRange, DateRangeIter, HolidaySet, is_non_workday, is_weekend};
pub use clock::TeamClock;
pub use date_format::{ISO_DATE, format_date, iso_date, parse_date};
pub use holiday::{
    Holiday, HolidayCategory, RecurringHoliday, easter_sunday, holidays_for_year,
    merge_holiday_feeds, national_holidays,
};
pub use roster::Roster;

// Re-export public types
pub use error::DomainError;
pub use types::{AbsenceReason, AssignmentId, DailyAssignment, Person, PersonId, Role, StatusKind};
pub use validation::{validate_assignment_override, validate_lookback_days, validate_person_fields};
