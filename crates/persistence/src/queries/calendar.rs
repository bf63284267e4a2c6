// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Holiday and absence lookups.

use diesel::prelude::*;
use diesel::SqliteConnection;
use rota_domain::{AbsenceInterval, Holiday, PersonId, format_date};
use time::{Date, Month};

use crate::data_models::{AbsenceRow, HolidayRow};
use crate::diesel_schema::{absences, holidays};
use crate::error::PersistenceError;

/// Lists stored holidays in date order, optionally restricted to one year.
///
/// # Errors
///
/// Returns an error if the query fails or a row is corrupt.
pub fn list_holidays(
    conn: &mut SqliteConnection,
    year: Option<i32>,
) -> Result<Vec<Holiday>, PersistenceError> {
    let mut query = holidays::table
        .select(HolidayRow::as_select())
        .order(holidays::holiday_date.asc())
        .into_boxed();

    if let Some(year) = year {
        let first: Date = Date::from_calendar_date(year, Month::January, 1)
            .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
        let last: Date = Date::from_calendar_date(year, Month::December, 31)
            .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
        query = query.filter(holidays::holiday_date.between(format_date(first), format_date(last)));
    }

    let rows: Vec<HolidayRow> = query.load(conn)?;
    rows.into_iter().map(Holiday::try_from).collect()
}

/// Lists every stored absence interval with its id, ordered by person and start.
///
/// # Errors
///
/// Returns an error if the query fails or a row is corrupt.
pub fn list_absences(
    conn: &mut SqliteConnection,
) -> Result<Vec<(i64, AbsenceInterval)>, PersistenceError> {
    let rows: Vec<AbsenceRow> = absences::table
        .select(AbsenceRow::as_select())
        .order((absences::person_id.asc(), absences::start_date.asc()))
        .load(conn)?;

    rows.into_iter()
        .map(|row| {
            let id: i64 = row.absence_id;
            row.into_interval().map(|interval| (id, interval))
        })
        .collect()
}

/// Lists one person's absence intervals ordered by start.
///
/// # Errors
///
/// Returns an error if the query fails or a row is corrupt.
pub fn list_absences_for(
    conn: &mut SqliteConnection,
    person_id: &PersonId,
) -> Result<Vec<AbsenceInterval>, PersistenceError> {
    let rows: Vec<AbsenceRow> = absences::table
        .select(AbsenceRow::as_select())
        .filter(absences::person_id.eq(person_id.value()))
        .order(absences::start_date.asc())
        .load(conn)?;

    rows.into_iter().map(AbsenceRow::into_interval).collect()
}
