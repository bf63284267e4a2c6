// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel::SqliteConnection;
use rota_domain::Roster;
use tracing::info;

use crate::data_models::PersonRow;
use crate::diesel_schema::people;
use crate::error::PersistenceError;

/// Writes the roster into the person directory.
///
/// Current members are inserted or updated in place. Rows for people who
/// left the roster are kept with their pool position cleared so that their
/// assignments and absences stay attributable.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `roster` - The configured roster
///
/// # Returns
///
/// The number of roster members written.
///
/// # Errors
///
/// Returns an error if any write fails. No partial sync is left behind.
pub fn sync_people(conn: &mut SqliteConnection, roster: &Roster) -> Result<usize, PersistenceError> {
    let mut rows: Vec<PersonRow> = Vec::with_capacity(roster.pool().len() + 1);
    rows.push(PersonRow::from_person(roster.fixed(), None));
    for (position, member) in roster.pool().iter().enumerate() {
        let position: i32 = i32::try_from(position).map_err(|e| {
            PersistenceError::QueryFailed(format!("pool position out of range: {e}"))
        })?;
        rows.push(PersonRow::from_person(member, Some(position)));
    }

    conn.transaction::<_, PersistenceError, _>(|conn| {
        diesel::update(people::table)
            .set(people::pool_position.eq(None::<i32>))
            .execute(conn)?;

        for row in &rows {
            diesel::insert_into(people::table)
                .values(row)
                .on_conflict(people::person_id)
                .do_update()
                .set((
                    people::name.eq(excluded(people::name)),
                    people::role.eq(excluded(people::role)),
                    people::pool_position.eq(excluded(people::pool_position)),
                ))
                .execute(conn)?;
        }
        Ok(())
    })?;

    info!(members = rows.len(), "Synced roster into person directory");
    Ok(rows.len())
}
