// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use rota_domain::{Person, PersonId};

use crate::data_models::PersonRow;
use crate::diesel_schema::people;
use crate::error::PersistenceError;

/// Lists every stored person, fixed first, then by pool position, then by id.
///
/// Former members keep their rows and sort after current pool members.
///
/// # Errors
///
/// Returns an error if the query fails or a row is corrupt.
pub fn list_people(conn: &mut SqliteConnection) -> Result<Vec<Person>, PersistenceError> {
    let mut rows: Vec<PersonRow> = people::table
        .select(PersonRow::as_select())
        .order(people::person_id.asc())
        .load(conn)?;
    rows.sort_by_key(|row| (row.role.clone(), row.pool_position.is_none(), row.pool_position));

    rows.into_iter().map(PersonRow::into_person).collect()
}

/// Checks whether a person is known to the store.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn person_exists(
    conn: &mut SqliteConnection,
    person_id: &PersonId,
) -> Result<bool, PersistenceError> {
    let count: i64 = people::table
        .filter(people::person_id.eq(person_id.value()))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}
