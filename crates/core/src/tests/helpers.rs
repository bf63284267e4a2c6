// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{AssignmentMatrix, EngineOptions, Schedule, ScheduleInputs, compute_schedule};
use rota_domain::{
    AbsenceCalendar, AbsenceInterval, AbsenceReason, DailyAssignment, DateRange, HolidaySet,
    Person, PersonId, Role, Roster, StatusKind,
};
use time::Date;

pub fn pid(id: &str) -> PersonId {
    PersonId::new(id).unwrap()
}

/// Fixed `f`, pool `a, b, c, d`, substitute `c`.
pub fn create_test_roster() -> Roster {
    let person = |id: &str, role: Role| Person::new(pid(id), id.to_uppercase(), role);
    Roster::new(
        person("f", Role::Fixed),
        vec![
            person("a", Role::Rotating),
            person("b", Role::Rotating),
            person("c", Role::Rotating),
            person("d", Role::Rotating),
        ],
        Some(pid("c")),
    )
    .unwrap()
}

pub fn create_test_vacation(id: &str, start: Date, length_days: i32) -> AbsenceInterval {
    AbsenceInterval::new(pid(id), start, length_days, AbsenceReason::Vacation).unwrap()
}

pub fn window(start: Date, end: Date) -> DateRange {
    DateRange::new(start, end).unwrap()
}

pub fn run(
    range: DateRange,
    roster: &Roster,
    holidays: &HolidaySet,
    absences: &AbsenceCalendar,
    history: &AssignmentMatrix,
) -> Schedule {
    run_with(range, roster, holidays, absences, history, EngineOptions::default())
}

pub fn run_with(
    range: DateRange,
    roster: &Roster,
    holidays: &HolidaySet,
    absences: &AbsenceCalendar,
    history: &AssignmentMatrix,
    options: EngineOptions,
) -> Schedule {
    let inputs: ScheduleInputs<'_> = ScheduleInputs {
        window: range,
        roster,
        holidays,
        absences,
        history,
        options,
    };
    compute_schedule(&inputs).unwrap()
}

/// The status of one person on one date in a computed schedule.
pub fn status_on(schedule: &Schedule, date: Date, id: &str) -> Option<StatusKind> {
    schedule
        .assignments
        .iter()
        .find(|a| a.date == date && a.person_id.value() == id)
        .map(|a| a.status)
}

/// Pool members on-site per workday, excluding the acting substitute.
pub fn rotation_sequence(schedule: &Schedule, roster: &Roster) -> Vec<String> {
    let mut sequence: Vec<String> = Vec::new();
    for date in schedule.window {
        let on_site: Vec<&DailyAssignment> = schedule
            .assignments
            .iter()
            .filter(|a| a.date == date && a.status == StatusKind::OnSite)
            .filter(|a| roster.pool_index(&a.person_id).is_some())
            .collect();
        let fixed_absent: bool = schedule
            .assignments
            .iter()
            .any(|a| a.date == date && a.person_id == roster.fixed().id && a.status.blocks_rotation());
        for assignment in on_site {
            if fixed_absent && Some(&assignment.person_id) == roster.substitute() {
                continue;
            }
            sequence.push(assignment.person_id.to_string());
        }
    }
    sequence
}
