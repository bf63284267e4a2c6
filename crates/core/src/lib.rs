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

mod continuity;
mod engine;
mod error;
mod matrix;
mod rotation;
mod verification;

#[cfg(test)]
mod tests;

use std::collections::HashSet;

use rota_domain::PersonId;

// Re-export public types and functions
pub use continuity::infer_cursor;
pub use engine::{
    DEFAULT_LOOKBACK_DAYS, EngineOptions, NonWorkdayAbsencePolicy, Schedule, ScheduleInputs,
    compute_schedule,
};
pub use error::CoreError;
pub use matrix::{AssignmentMatrix, DEFAULT_MAX_BATCH_OPS, MergePlan, WriteBatch, plan_merge};
pub use rotation::{CursorRotation, ReturnQueueRotation, RotationPolicy, RotationStrategy};
pub use verification::{
    DEFAULT_REQUIRED_ON_SITE, VerificationReport, Violation, ViolationKind, verify_schedule,
};

/// A computed schedule together with the writes that store it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recalculation {
    /// The computed schedule.
    pub schedule: Schedule,
    /// Store writes reconciling history with the schedule.
    pub plan: MergePlan,
}

/// Recomputes a window and plans the merge into stored history.
///
/// The history in `inputs` serves both as the continuity source and as the
/// matrix being merged into. Only managed persons inside the window are
/// touched.
///
/// # Arguments
///
/// * `inputs` - The window, roster, calendars, history and options
///
/// # Returns
///
/// The schedule and its merge plan. Re-running over unchanged inputs after
/// applying the plan yields an empty plan.
///
/// # Errors
///
/// Returns an error if the engine rejects its inputs.
pub fn recalculate(inputs: &ScheduleInputs<'_>) -> Result<Recalculation, CoreError> {
    let schedule: Schedule = compute_schedule(inputs)?;
    let managed: HashSet<PersonId> = inputs.roster.managed_ids();
    let plan: MergePlan = plan_merge(
        inputs.history,
        inputs.window,
        &managed,
        &schedule.assignments,
    )?;

    tracing::info!(
        start = %inputs.window.start(),
        end = %inputs.window.end(),
        workdays = schedule.workdays,
        deletions = plan.deletions.len(),
        upserts = plan.upserts.len(),
        "Recalculated rotation"
    );
    Ok(Recalculation { schedule, plan })
}
