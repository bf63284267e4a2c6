// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the on-site rota.
//!
//! Stores the person directory, holidays, absence intervals and daily
//! assignments in `SQLite` through Diesel. Migrations are embedded and run
//! on every open.
//!
//! ## Storage Conventions
//!
//! - Dates are `YYYY-MM-DD` text, so lexical order is chronological order
//! - Assignments are keyed by their composite id `{date}-{person_id}`
//! - Rows read back are re-validated; unparseable rows surface as
//!   [`PersistenceError::CorruptRow`]
//!
//! ## Testing
//!
//! Tests run against isolated in-memory databases created with
//! [`Persistence::new_in_memory`].

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
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use rota::{AssignmentMatrix, MergePlan};
use rota_domain::{
    AbsenceCalendar, AbsenceInterval, DailyAssignment, DateRange, Holiday, HolidaySet, Person,
    PersonId, Roster,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use mutations::MergeCommit;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Type alias kept for callers that name the backend explicitly.
pub type SqlitePersistence = Persistence;

/// Persistence adapter for the rota store.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a distinct shared-cache database, so adapters
    /// created in parallel tests never see each other's rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_rota_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // People
    // ========================================================================

    /// Writes the roster into the person directory.
    ///
    /// Never deletes people; former members lose their pool position only.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync fails.
    pub fn sync_people(&mut self, roster: &Roster) -> Result<usize, PersistenceError> {
        mutations::people::sync_people(&mut self.conn, roster)
    }

    /// Lists the person directory, current roster order first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_people(&mut self) -> Result<Vec<Person>, PersistenceError> {
        queries::people::list_people(&mut self.conn)
    }

    /// Checks whether a person is in the directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn person_exists(&mut self, person_id: &PersonId) -> Result<bool, PersistenceError> {
        queries::people::person_exists(&mut self.conn, person_id)
    }

    // ========================================================================
    // Holidays
    // ========================================================================

    /// Imports a holiday feed, replacing stored holidays on the same dates.
    ///
    /// # Errors
    ///
    /// Returns an error if the import fails.
    pub fn import_holidays(&mut self, feed: &[Holiday]) -> Result<usize, PersistenceError> {
        mutations::calendar::import_holidays(&mut self.conn, feed)
    }

    /// Lists stored holidays, optionally for a single year.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_holidays(&mut self, year: Option<i32>) -> Result<Vec<Holiday>, PersistenceError> {
        queries::calendar::list_holidays(&mut self.conn, year)
    }

    /// Loads every stored holiday date as a lookup set.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn holiday_set(&mut self) -> Result<HolidaySet, PersistenceError> {
        Ok(self.list_holidays(None)?.into_iter().map(|h| h.date).collect())
    }

    // ========================================================================
    // Absences
    // ========================================================================

    /// Stores an absence interval and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the person is unknown or the insert fails.
    pub fn insert_absence(&mut self, interval: &AbsenceInterval) -> Result<i64, PersistenceError> {
        mutations::calendar::insert_absence(&mut self.conn, interval)
    }

    /// Lists every stored absence interval with its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_absences(&mut self) -> Result<Vec<(i64, AbsenceInterval)>, PersistenceError> {
        queries::calendar::list_absences(&mut self.conn)
    }

    /// Lists one person's absence intervals.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_absences_for(
        &mut self,
        person_id: &PersonId,
    ) -> Result<Vec<AbsenceInterval>, PersistenceError> {
        queries::calendar::list_absences_for(&mut self.conn, person_id)
    }

    /// Loads every stored absence interval as an engine calendar.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn absence_calendar(&mut self) -> Result<AbsenceCalendar, PersistenceError> {
        let intervals: Vec<AbsenceInterval> = self
            .list_absences()?
            .into_iter()
            .map(|(_, interval)| interval)
            .collect();
        Ok(AbsenceCalendar::new(intervals))
    }

    // ========================================================================
    // Assignments
    // ========================================================================

    /// Lists stored assignments inside a window, by date then person.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_assignments(
        &mut self,
        window: DateRange,
    ) -> Result<Vec<DailyAssignment>, PersistenceError> {
        queries::assignments::load_assignments_between(&mut self.conn, window.start(), window.end())
    }

    /// Loads the assignment history a recalculation of `window` needs.
    ///
    /// Covers `lookback_days` before the window for continuity plus the
    /// window itself for blocking records and the merge.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn load_history(
        &mut self,
        window: DateRange,
        lookback_days: u32,
    ) -> Result<AssignmentMatrix, PersistenceError> {
        let from: time::Date = window
            .start()
            .checked_sub(time::Duration::days(i64::from(lookback_days)))
            .unwrap_or(time::Date::MIN);
        let rows: Vec<DailyAssignment> =
            queries::assignments::load_assignments_between(&mut self.conn, from, window.end())?;
        Ok(rows.into_iter().collect())
    }

    /// Counts every stored assignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_assignments(&mut self) -> Result<i64, PersistenceError> {
        queries::assignments::count_assignments(&mut self.conn)
    }

    /// Inserts or replaces one assignment by composite id.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn upsert_assignment(&mut self, assignment: &DailyAssignment) -> Result<(), PersistenceError> {
        mutations::assignments::upsert_assignment(&mut self.conn, assignment)
    }

    /// Commits a merge plan atomically in bounded batches.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch size is zero or any batch fails; in the
    /// latter case nothing is written.
    pub fn apply_merge_plan(
        &mut self,
        plan: &MergePlan,
        max_ops: usize,
    ) -> Result<MergeCommit, PersistenceError> {
        mutations::assignments::apply_merge_plan(&mut self.conn, plan, max_ops)
    }
}
