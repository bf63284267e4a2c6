// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversions to domain values.
//!
//! Dates are stored as `YYYY-MM-DD` text and enums as their snake case
//! names. Reading a row back re-validates it through the domain
//! constructors; a row that no longer parses is reported as corrupt.

use diesel::prelude::*;
use rota_domain::{
    AbsenceInterval, AbsenceReason, DailyAssignment, Holiday, HolidayCategory, Person, PersonId,
    Role, StatusKind, format_date, parse_date,
};

use crate::diesel_schema::{absences, assignments, holidays, people};
use crate::error::PersistenceError;

/// A stored team member.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = people)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct PersonRow {
    pub person_id: String,
    pub name: String,
    pub role: String,
    pub pool_position: Option<i32>,
}

impl PersonRow {
    /// Builds a row for a roster member.
    ///
    /// `pool_position` is `None` for the fixed person.
    pub fn from_person(person: &Person, pool_position: Option<i32>) -> Self {
        Self {
            person_id: person.id.to_string(),
            name: person.name.clone(),
            role: person.role.as_str().to_string(),
            pool_position,
        }
    }

    /// Converts the row back into a domain person.
    ///
    /// # Errors
    ///
    /// Returns `CorruptRow` if the id or role no longer parse.
    pub fn into_person(self) -> Result<Person, PersistenceError> {
        let id: PersonId = PersonId::new(&self.person_id)?;
        let role: Role = self.role.parse()?;
        Ok(Person::new(id, self.name, role))
    }
}

/// A stored holiday.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = holidays)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HolidayRow {
    pub holiday_date: String,
    pub name: String,
    pub category: String,
}

impl From<&Holiday> for HolidayRow {
    fn from(holiday: &Holiday) -> Self {
        Self {
            holiday_date: format_date(holiday.date),
            name: holiday.name.clone(),
            category: holiday.category.as_str().to_string(),
        }
    }
}

impl TryFrom<HolidayRow> for Holiday {
    type Error = PersistenceError;

    fn try_from(row: HolidayRow) -> Result<Self, Self::Error> {
        let category: HolidayCategory = row.category.parse()?;
        Ok(Self::new(parse_date(&row.holiday_date)?, row.name, category))
    }
}

/// A stored absence interval as read back, with its surrogate id.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = absences)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AbsenceRow {
    pub absence_id: i64,
    pub person_id: String,
    pub start_date: String,
    pub length_days: i32,
    pub reason: String,
}

impl AbsenceRow {
    /// Converts the row back into a validated interval.
    ///
    /// # Errors
    ///
    /// Returns `CorruptRow` if any field fails domain validation.
    pub fn into_interval(self) -> Result<AbsenceInterval, PersistenceError> {
        let reason: AbsenceReason = self.reason.parse()?;
        Ok(AbsenceInterval::new(
            PersonId::new(&self.person_id)?,
            parse_date(&self.start_date)?,
            self.length_days,
            reason,
        )?)
    }
}

/// A new absence interval; the id is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = absences)]
pub struct NewAbsenceRow {
    pub person_id: String,
    pub start_date: String,
    pub length_days: i32,
    pub reason: String,
}

impl From<&AbsenceInterval> for NewAbsenceRow {
    fn from(interval: &AbsenceInterval) -> Self {
        Self {
            person_id: interval.person_id().to_string(),
            start_date: format_date(interval.start()),
            length_days: interval.length_days(),
            reason: interval.reason().as_str().to_string(),
        }
    }
}

/// A stored daily assignment.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = assignments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct AssignmentRow {
    pub assignment_id: String,
    pub assignment_date: String,
    pub person_id: String,
    pub status: String,
    pub note: Option<String>,
}

impl From<&DailyAssignment> for AssignmentRow {
    fn from(assignment: &DailyAssignment) -> Self {
        Self {
            assignment_id: assignment.id().to_string(),
            assignment_date: format_date(assignment.date),
            person_id: assignment.person_id.to_string(),
            status: assignment.status.as_str().to_string(),
            note: assignment.note.clone(),
        }
    }
}

impl TryFrom<AssignmentRow> for DailyAssignment {
    type Error = PersistenceError;

    fn try_from(row: AssignmentRow) -> Result<Self, Self::Error> {
        let status: StatusKind = row.status.parse()?;
        let assignment: Self = Self::new(
            parse_date(&row.assignment_date)?,
            PersonId::new(&row.person_id)?,
            status,
        )
        .with_note(row.note);

        if assignment.id().to_string() != row.assignment_id {
            return Err(PersistenceError::CorruptRow(format!(
                "assignment id {} does not match its date and person",
                row.assignment_id
            )));
        }
        Ok(assignment)
    }
}
