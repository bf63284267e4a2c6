// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use rota_domain::{DailyAssignment, format_date};
use time::Date;

use crate::data_models::AssignmentRow;
use crate::diesel_schema::assignments;
use crate::error::PersistenceError;

/// Loads stored assignments with dates in `start..=end`, ordered by date then person.
///
/// Text dates compare correctly because they are zero-padded `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns an error if the query fails or a row is corrupt.
pub fn load_assignments_between(
    conn: &mut SqliteConnection,
    start: Date,
    end: Date,
) -> Result<Vec<DailyAssignment>, PersistenceError> {
    let rows: Vec<AssignmentRow> = assignments::table
        .select(AssignmentRow::as_select())
        .filter(assignments::assignment_date.between(format_date(start), format_date(end)))
        .order((assignments::assignment_date.asc(), assignments::person_id.asc()))
        .load(conn)?;

    rows.into_iter().map(DailyAssignment::try_from).collect()
}

/// Counts every stored assignment.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_assignments(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(assignments::table.count().get_result(conn)?)
}
