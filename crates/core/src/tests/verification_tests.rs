// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{create_test_roster, create_test_vacation, pid, run, window};
use crate::{
    AssignmentMatrix, DEFAULT_REQUIRED_ON_SITE, Schedule, VerificationReport, ViolationKind,
    verify_schedule,
};
use rota_domain::{AbsenceCalendar, DailyAssignment, HolidaySet, Roster, StatusKind};
use time::macros::date;

fn stored(schedule: &Schedule) -> AssignmentMatrix {
    schedule.assignments.iter().cloned().collect()
}

#[test]
fn test_engine_output_verifies_clean() {
    let roster: Roster = create_test_roster();
    let range = window(date!(2026 - 03 - 02), date!(2026 - 03 - 31));
    let absences: AbsenceCalendar = AbsenceCalendar::new(vec![
        create_test_vacation("f", date!(2026 - 03 - 09), 5),
        create_test_vacation("b", date!(2026 - 03 - 16), 3),
    ]);
    let schedule: Schedule = run(
        range,
        &roster,
        &HolidaySet::new(),
        &absences,
        &AssignmentMatrix::new(),
    );

    let report: VerificationReport = verify_schedule(
        range,
        &roster,
        &HolidaySet::new(),
        &stored(&schedule),
        DEFAULT_REQUIRED_ON_SITE,
    );
    assert!(report.is_clean(), "{:?}", report.violations);
    assert_eq!(report.workdays_checked, 22);
}

#[test]
fn test_reports_missing_records_and_coverage() {
    let roster: Roster = create_test_roster();
    let range = window(date!(2026 - 03 - 02), date!(2026 - 03 - 02));
    let matrix: AssignmentMatrix = std::iter::once(DailyAssignment::new(
        date!(2026 - 03 - 02),
        pid("f"),
        StatusKind::OnSite,
    ))
    .collect();

    let report: VerificationReport =
        verify_schedule(range, &roster, &HolidaySet::new(), &matrix, 2);
    assert_eq!(
        report.count_where(|k| matches!(k, ViolationKind::MissingRecord { .. })),
        4
    );
    assert_eq!(
        report.count_where(|k| matches!(
            k,
            ViolationKind::InsufficientCoverage {
                on_site: 1,
                required: 2
            }
        )),
        1
    );
}

#[test]
fn test_reports_substitute_not_on_site() {
    let roster: Roster = create_test_roster();
    let day = date!(2026 - 03 - 02);
    let matrix: AssignmentMatrix = [
        DailyAssignment::new(
            day,
            pid("f"),
            StatusKind::Absent(rota_domain::AbsenceReason::Vacation),
        ),
        DailyAssignment::new(day, pid("a"), StatusKind::OnSite),
        DailyAssignment::new(day, pid("b"), StatusKind::Remote),
        DailyAssignment::new(day, pid("c"), StatusKind::Remote),
        DailyAssignment::new(day, pid("d"), StatusKind::Remote),
    ]
    .into_iter()
    .collect();

    let report: VerificationReport =
        verify_schedule(window(day, day), &roster, &HolidaySet::new(), &matrix, 2);
    assert_eq!(
        report.count_where(|k| matches!(k, ViolationKind::SubstituteNotOnSite { .. })),
        1
    );
    assert_eq!(
        report.count_where(|k| matches!(k, ViolationKind::InsufficientCoverage { .. })),
        1
    );
}

#[test]
fn test_reports_fixed_remote_and_double_rotation() {
    let roster: Roster = create_test_roster();
    let day = date!(2026 - 03 - 02);
    let matrix: AssignmentMatrix = [
        DailyAssignment::new(day, pid("f"), StatusKind::Remote),
        DailyAssignment::new(day, pid("a"), StatusKind::OnSite),
        DailyAssignment::new(day, pid("b"), StatusKind::OnSite),
        DailyAssignment::new(day, pid("c"), StatusKind::Remote),
        DailyAssignment::new(day, pid("d"), StatusKind::Remote),
    ]
    .into_iter()
    .collect();

    let report: VerificationReport =
        verify_schedule(window(day, day), &roster, &HolidaySet::new(), &matrix, 2);
    assert_eq!(report.count_where(|k| *k == ViolationKind::FixedNotOnSite), 1);
    assert_eq!(
        report.count_where(|k| *k == ViolationKind::MultipleRotatingOnSite { count: 2 }),
        1
    );
    assert_eq!(report.violations.len(), 2);
}

#[test]
fn test_reports_presence_on_non_workday() {
    let roster: Roster = create_test_roster();
    let saturday = date!(2026 - 03 - 07);
    let matrix: AssignmentMatrix =
        std::iter::once(DailyAssignment::new(saturday, pid("a"), StatusKind::OnSite)).collect();

    let report: VerificationReport = verify_schedule(
        window(saturday, saturday),
        &roster,
        &HolidaySet::new(),
        &matrix,
        2,
    );
    assert_eq!(report.workdays_checked, 0);
    assert_eq!(
        report.violations[0].kind,
        ViolationKind::PresenceOnNonWorkday { person_id: pid("a") }
    );
}
