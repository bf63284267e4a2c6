// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use rota_domain::{AbsenceInterval, Holiday};
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{HolidayRow, NewAbsenceRow};
use crate::diesel_schema::{absences, holidays};
use crate::error::PersistenceError;

/// Imports a holiday feed, replacing any stored holiday on the same date.
///
/// # Errors
///
/// Returns an error if any write fails; the import is all-or-nothing.
pub fn import_holidays(
    conn: &mut SqliteConnection,
    feed: &[Holiday],
) -> Result<usize, PersistenceError> {
    let rows: Vec<HolidayRow> = feed.iter().map(HolidayRow::from).collect();

    conn.transaction::<_, PersistenceError, _>(|conn| {
        for row in &rows {
            diesel::replace_into(holidays::table)
                .values(row)
                .execute(conn)?;
        }
        Ok(())
    })?;

    info!(count = rows.len(), "Imported holidays");
    Ok(rows.len())
}

/// Stores an absence interval.
///
/// Overlap checks belong to the caller; the database only enforces that
/// the person exists and the length is positive.
///
/// # Returns
///
/// The id assigned to the stored interval.
///
/// # Errors
///
/// Returns an error if the person is unknown or the insert fails.
pub fn insert_absence(
    conn: &mut SqliteConnection,
    interval: &AbsenceInterval,
) -> Result<i64, PersistenceError> {
    let row: NewAbsenceRow = NewAbsenceRow::from(interval);
    diesel::insert_into(absences::table)
        .values(&row)
        .execute(conn)?;
    let absence_id: i64 = get_last_insert_rowid(conn)?;

    info!(
        absence_id,
        person_id = %interval.person_id(),
        start = %interval.start(),
        length_days = interval.length_days(),
        "Registered absence"
    );
    Ok(absence_id)
}
