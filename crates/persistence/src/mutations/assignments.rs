// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Assignment writes.
//!
//! A merge plan is committed inside a single transaction, one bounded batch
//! at a time. If any batch fails the whole plan is rolled back and the
//! caller re-runs the window.

use diesel::prelude::*;
use diesel::SqliteConnection;
use rota::{MergePlan, WriteBatch};
use rota_domain::DailyAssignment;
use tracing::{debug, info};

use crate::data_models::AssignmentRow;
use crate::diesel_schema::assignments;
use crate::error::PersistenceError;

/// Summary of a committed merge plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeCommit {
    /// Batches written.
    pub batches: usize,
    /// Assignments deleted.
    pub deletions: usize,
    /// Assignments inserted or replaced.
    pub upserts: usize,
}

/// Inserts or replaces one assignment by its composite id.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn upsert_assignment(
    conn: &mut SqliteConnection,
    assignment: &DailyAssignment,
) -> Result<(), PersistenceError> {
    let row: AssignmentRow = AssignmentRow::from(assignment);
    diesel::replace_into(assignments::table)
        .values(&row)
        .execute(conn)?;
    Ok(())
}

/// Commits a merge plan atomically in batches of at most `max_ops` operations.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `plan` - Deletions and upserts produced by a recalculation
/// * `max_ops` - Upper bound on operations per batch
///
/// # Errors
///
/// Returns `InvalidMergePlan` if `max_ops` is zero, and `BatchCommitFailed`
/// naming the first failing batch otherwise. Nothing is written on error.
pub fn apply_merge_plan(
    conn: &mut SqliteConnection,
    plan: &MergePlan,
    max_ops: usize,
) -> Result<MergeCommit, PersistenceError> {
    let batches: Vec<WriteBatch> = plan.batches(max_ops)?;
    let total: usize = batches.len();
    if total == 0 {
        debug!("Merge plan is empty; nothing to commit");
        return Ok(MergeCommit::default());
    }

    conn.transaction::<_, PersistenceError, _>(|conn| {
        for (index, batch) in batches.iter().enumerate() {
            write_batch(conn, batch).map_err(|e| PersistenceError::BatchCommitFailed {
                batch: index + 1,
                total,
                message: e.to_string(),
            })?;
            debug!(
                batch = index + 1,
                total,
                operations = batch.len(),
                "Wrote assignment batch"
            );
        }
        Ok(())
    })?;

    let commit: MergeCommit = MergeCommit {
        batches: total,
        deletions: plan.deletions.len(),
        upserts: plan.upserts.len(),
    };
    info!(
        batches = commit.batches,
        deletions = commit.deletions,
        upserts = commit.upserts,
        "Committed merge plan"
    );
    Ok(commit)
}

fn write_batch(conn: &mut SqliteConnection, batch: &WriteBatch) -> Result<(), PersistenceError> {
    if !batch.deletions.is_empty() {
        let ids: Vec<String> = batch.deletions.iter().map(ToString::to_string).collect();
        diesel::delete(assignments::table.filter(assignments::assignment_id.eq_any(ids)))
            .execute(conn)?;
    }

    for assignment in &batch.upserts {
        diesel::replace_into(assignments::table)
            .values(AssignmentRow::from(assignment))
            .execute(conn)?;
    }
    Ok(())
}
