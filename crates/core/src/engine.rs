// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The rotation engine.
//!
//! Computes daily presence over a window, one day at a time in ascending
//! order. The computation is pure: the same inputs always produce the same
//! schedule, and nothing outside the returned value is modified.
//!
//! ## Per-day rules
//!
//! - Non-workdays get no rotation assignment and leave the cursor untouched
//! - A person is unavailable if an absence interval covers the day or their
//!   stored record for the day is a blocking status
//! - If the fixed person is unavailable, the substitute is forced on-site and
//!   leaves today's candidate pool
//! - The rotation strategy fills the single rotating slot from the remaining pool
//! - Absence always wins when emitting a person's status

use crate::continuity::infer_cursor;
use crate::error::CoreError;
use crate::matrix::AssignmentMatrix;
use crate::rotation::{RotationPolicy, RotationStrategy};
use rota_domain::{
    AbsenceCalendar, DailyAssignment, DateRange, HolidaySet, PersonId, Roster, StatusKind,
    is_non_workday, validate_lookback_days,
};
use serde::{Deserialize, Serialize};
use time::Date;

/// Default continuity lookback, in days.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 30;

/// What to do with absences that fall on weekends and holidays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonWorkdayAbsencePolicy {
    /// Emit an absence record for every calendar day of an interval.
    #[default]
    Materialize,
    /// Emit absence records on workdays only.
    Skip,
}

/// Engine tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Days of history scanned for rotation continuity.
    pub lookback_days: u32,
    /// Rotation strategy.
    pub rotation_policy: RotationPolicy,
    /// Handling of absences on non-workdays.
    pub non_workday_absences: NonWorkdayAbsencePolicy,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            rotation_policy: RotationPolicy::default(),
            non_workday_absences: NonWorkdayAbsencePolicy::default(),
        }
    }
}

/// Everything one engine run reads.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleInputs<'a> {
    /// The window to compute.
    pub window: DateRange,
    /// The team.
    pub roster: &'a Roster,
    /// Holiday dates.
    pub holidays: &'a HolidaySet,
    /// Absence intervals.
    pub absences: &'a AbsenceCalendar,
    /// Previously stored assignments.
    pub history: &'a AssignmentMatrix,
    /// Engine options.
    pub options: EngineOptions,
}

/// The result of one engine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    /// The computed window.
    pub window: DateRange,
    /// Computed assignments, ordered by date then roster order.
    pub assignments: Vec<DailyAssignment>,
    /// The cursor the run started from.
    pub starting_cursor: usize,
    /// Number of workdays in the window.
    pub workdays: usize,
    /// Workdays on which nobody covered the fixed role.
    pub uncovered_days: Vec<Date>,
    /// Workdays on which the rotating slot stayed empty.
    pub unfilled_slots: Vec<Date>,
}

/// Computes daily assignments for every day of the window.
///
/// # Arguments
///
/// * `inputs` - The window, roster, calendars, history and options
///
/// # Returns
///
/// The schedule, or an error if the options are invalid. No partial
/// schedule is ever returned.
///
/// # Errors
///
/// Returns an error if the lookback is out of range.
pub fn compute_schedule(inputs: &ScheduleInputs<'_>) -> Result<Schedule, CoreError> {
    validate_lookback_days(inputs.options.lookback_days)?;

    let window: DateRange = inputs.window;
    let roster: &Roster = inputs.roster;
    let starting_cursor: usize = infer_cursor(
        window.start(),
        inputs.options.lookback_days,
        roster,
        inputs.history,
    );
    let mut strategy: Box<dyn RotationStrategy> =
        inputs.options.rotation_policy.strategy(starting_cursor);

    let day_count: usize = usize::try_from(window.days()).unwrap_or(0);
    let mut schedule: Schedule = Schedule {
        window,
        assignments: Vec::with_capacity(day_count * roster.members().count()),
        starting_cursor,
        workdays: 0,
        uncovered_days: Vec::new(),
        unfilled_slots: Vec::new(),
    };

    for date in window {
        let returned: Vec<PersonId> = returning_members(inputs, date);
        if !returned.is_empty() {
            strategy.record_returns(date, &returned);
        }
        if is_non_workday(date, inputs.holidays) {
            emit_non_workday(inputs, date, &mut schedule.assignments);
            continue;
        }
        schedule.workdays += 1;
        compute_workday(inputs, date, strategy.as_mut(), &mut schedule);
    }

    tracing::debug!(
        start = %window.start(),
        end = %window.end(),
        starting_cursor,
        final_cursor = strategy.cursor(),
        assignments = schedule.assignments.len(),
        "Computed schedule"
    );
    Ok(schedule)
}

/// The blocking record for a person on a date, if any.
///
/// A stored blocking record is returned verbatim, note included. Otherwise an
/// absence interval covering the day yields a fresh absence record.
fn blocking_record(
    inputs: &ScheduleInputs<'_>,
    date: Date,
    person_id: &PersonId,
) -> Option<DailyAssignment> {
    if let Some(stored) = inputs.history.get(date, person_id)
        && stored.status.blocks_rotation()
    {
        return Some(stored.clone());
    }
    inputs.absences.absence_on(person_id, date).map(|reason| {
        DailyAssignment::new(date, person_id.clone(), StatusKind::Absent(reason))
    })
}

/// Pool members available on `date` who were unavailable the day before.
fn returning_members(inputs: &ScheduleInputs<'_>, date: Date) -> Vec<PersonId> {
    let Some(yesterday) = date.previous_day() else {
        return Vec::new();
    };
    inputs
        .roster
        .pool()
        .iter()
        .map(|p| &p.id)
        .filter(|id| {
            blocking_record(inputs, yesterday, id).is_some()
                && blocking_record(inputs, date, id).is_none()
        })
        .cloned()
        .collect()
}

fn emit_non_workday(inputs: &ScheduleInputs<'_>, date: Date, out: &mut Vec<DailyAssignment>) {
    for member in inputs.roster.members() {
        let stored: Option<&DailyAssignment> = inputs
            .history
            .get(date, &member.id)
            .filter(|a| a.status.blocks_rotation());
        if let Some(stored) = stored {
            out.push(stored.clone());
            continue;
        }
        if inputs.options.non_workday_absences == NonWorkdayAbsencePolicy::Materialize
            && let Some(reason) = inputs.absences.absence_on(&member.id, date)
        {
            out.push(DailyAssignment::new(
                date,
                member.id.clone(),
                StatusKind::Absent(reason),
            ));
        }
    }
}

fn compute_workday(
    inputs: &ScheduleInputs<'_>,
    date: Date,
    strategy: &mut dyn RotationStrategy,
    schedule: &mut Schedule,
) {
    let roster: &Roster = inputs.roster;
    let is_available = |id: &PersonId| blocking_record(inputs, date, id).is_none();

    let fixed_available: bool = is_available(&roster.fixed().id);
    let acting_fixed: Option<&PersonId> = if fixed_available {
        None
    } else {
        roster.substitute()
    };

    let candidates: Vec<&PersonId> = roster
        .pool()
        .iter()
        .map(|p| &p.id)
        .filter(|id| Some(*id) != acting_fixed)
        .collect();
    let rotating: Option<PersonId> = strategy.select(date, &candidates, &is_available);

    if !fixed_available && !acting_fixed.is_some_and(&is_available) {
        tracing::warn!(%date, fixed = %roster.fixed().id, "No on-site cover for the fixed role");
        schedule.uncovered_days.push(date);
    }
    if rotating.is_none() {
        tracing::debug!(%date, "Rotating slot left empty");
        schedule.unfilled_slots.push(date);
    }

    for member in roster.members() {
        let assignment: DailyAssignment =
            blocking_record(inputs, date, &member.id).unwrap_or_else(|| {
                let on_site: bool = member.id == roster.fixed().id
                    || acting_fixed == Some(&member.id)
                    || rotating.as_ref() == Some(&member.id);
                let status: StatusKind = if on_site {
                    StatusKind::OnSite
                } else {
                    StatusKind::Remote
                };
                DailyAssignment::new(date, member.id.clone(), status)
            });
        schedule.assignments.push(assignment);
    }
}
