// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Absence intervals and the per-person absence resolver.
//!
//! Intervals are measured in calendar days: weekends and holidays that fall
//! inside an interval are consumed by it.

use crate::error::DomainError;
use crate::types::{AbsenceReason, PersonId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use time::{Date, Duration};

/// A contiguous block of calendar days during which a person is away.
///
/// ## Invariants
///
/// - `length_days >= 1`
/// - `end() == start + length_days - 1`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AbsenceIntervalRecord")]
pub struct AbsenceInterval {
    person_id: PersonId,
    #[serde(with = "crate::date_format::iso_date")]
    start: Date,
    length_days: i32,
    reason: AbsenceReason,
}

/// Unvalidated wire shape of an [`AbsenceInterval`].
#[derive(Deserialize)]
struct AbsenceIntervalRecord {
    person_id: PersonId,
    #[serde(with = "crate::date_format::iso_date")]
    start: Date,
    length_days: i32,
    reason: AbsenceReason,
}

impl TryFrom<AbsenceIntervalRecord> for AbsenceInterval {
    type Error = DomainError;

    fn try_from(value: AbsenceIntervalRecord) -> Result<Self, Self::Error> {
        Self::new(value.person_id, value.start, value.length_days, value.reason)
    }
}

impl AbsenceInterval {
    /// Creates a validated absence interval.
    ///
    /// # Arguments
    ///
    /// * `person_id` - Who is absent
    /// * `start` - First absent day
    /// * `length_days` - Number of calendar days, at least 1
    /// * `reason` - Why the person is absent
    ///
    /// # Errors
    ///
    /// Returns an error if `length_days` is not positive or the end date
    /// overflows the supported calendar.
    pub fn new(
        person_id: PersonId,
        start: Date,
        length_days: i32,
        reason: AbsenceReason,
    ) -> Result<Self, DomainError> {
        if length_days <= 0 {
            return Err(DomainError::InvalidAbsenceLength {
                person_id: person_id.to_string(),
                start,
                length_days,
            });
        }
        start
            .checked_add(Duration::days(i64::from(length_days - 1)))
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: format!("computing end of {length_days}-day absence from {start}"),
            })?;
        Ok(Self {
            person_id,
            start,
            length_days,
            reason,
        })
    }

    /// Returns the absent person.
    #[must_use]
    pub const fn person_id(&self) -> &PersonId {
        &self.person_id
    }

    /// Returns the first absent day.
    #[must_use]
    pub const fn start(&self) -> Date {
        self.start
    }

    /// Returns the length in calendar days.
    #[must_use]
    pub const fn length_days(&self) -> i32 {
        self.length_days
    }

    /// Returns the absence reason.
    #[must_use]
    pub const fn reason(&self) -> AbsenceReason {
        self.reason
    }

    /// Returns the last absent day, inclusive.
    #[must_use]
    pub fn end(&self) -> Date {
        // Checked at construction.
        self.start
            .saturating_add(Duration::days(i64::from(self.length_days - 1)))
    }

    /// Whether the interval covers the date.
    #[must_use]
    pub fn covers(&self, date: Date) -> bool {
        self.start <= date && date <= self.end()
    }

    /// Whether two intervals of the same person share at least one day.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.person_id == other.person_id
            && self.start <= other.end()
            && other.start <= self.end()
    }

    /// Expands the interval into its calendar days.
    pub fn days(&self) -> impl Iterator<Item = Date> + '_ {
        (0..i64::from(self.length_days))
            .map(|offset| self.start.saturating_add(Duration::days(offset)))
    }
}

/// Rejects overlapping intervals belonging to the same person.
///
/// # Errors
///
/// Returns `DomainError::OverlappingAbsence` naming the first overlap found,
/// ordered by start date.
pub fn validate_no_overlap(intervals: &[AbsenceInterval]) -> Result<(), DomainError> {
    let mut by_person: HashMap<&PersonId, Vec<&AbsenceInterval>> = HashMap::new();
    for interval in intervals {
        by_person.entry(&interval.person_id).or_default().push(interval);
    }

    for (person_id, mut list) in by_person {
        list.sort_by_key(|i| i.start);
        for pair in list.windows(2) {
            if pair[0].end() >= pair[1].start {
                return Err(DomainError::OverlappingAbsence {
                    person_id: person_id.to_string(),
                    first_start: pair[0].start,
                    second_start: pair[1].start,
                });
            }
        }
    }
    Ok(())
}

/// Answers "is this person absent on this date?" for the rotation engine.
///
/// Intervals are indexed per person and sorted by start, so a lookup is a
/// binary search over one person's intervals.
#[derive(Debug, Clone, Default)]
pub struct AbsenceCalendar {
    by_person: HashMap<PersonId, Vec<AbsenceInterval>>,
}

impl AbsenceCalendar {
    /// Indexes the given intervals.
    ///
    /// Overlap is not re-checked here; it is rejected when an interval is
    /// registered. If overlapping intervals do slip through, the one with the
    /// latest start at or before the date wins.
    #[must_use]
    pub fn new(intervals: Vec<AbsenceInterval>) -> Self {
        let mut by_person: HashMap<PersonId, Vec<AbsenceInterval>> = HashMap::new();
        for interval in intervals {
            by_person
                .entry(interval.person_id.clone())
                .or_default()
                .push(interval);
        }
        for list in by_person.values_mut() {
            list.sort_by_key(|i| i.start);
        }
        Self { by_person }
    }

    /// Returns the absence reason if the person is absent on the date.
    #[must_use]
    pub fn absence_on(&self, person_id: &PersonId, date: Date) -> Option<AbsenceReason> {
        let list: &Vec<AbsenceInterval> = self.by_person.get(person_id)?;
        // Number of intervals starting on or before the date.
        let idx: usize = list.partition_point(|i| i.start <= date);
        let candidate: &AbsenceInterval = list.get(idx.checked_sub(1)?)?;
        candidate.covers(date).then_some(candidate.reason)
    }

    /// Whether the person is absent on the date.
    #[must_use]
    pub fn is_absent(&self, person_id: &PersonId, date: Date) -> bool {
        self.absence_on(person_id, date).is_some()
    }

    /// Every indexed interval, grouped by person.
    pub fn intervals(&self) -> impl Iterator<Item = &AbsenceInterval> {
        self.by_person.values().flatten()
    }

    /// Whether no intervals are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_person.is_empty()
    }
}
