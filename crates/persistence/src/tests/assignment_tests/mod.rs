// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_test_assignment, create_test_persistence, create_test_roster};
use crate::{MergeCommit, Persistence, PersistenceError};
use diesel::RunQueryDsl;
use rota::{
    AssignmentMatrix, EngineOptions, MergePlan, Recalculation, ScheduleInputs, recalculate,
};
use rota_domain::{
    AbsenceCalendar, AbsenceReason, DailyAssignment, DateRange, HolidaySet, Roster, StatusKind,
};
use time::macros::date;

fn march() -> DateRange {
    DateRange::new(date!(2026 - 03 - 01), date!(2026 - 03 - 31)).unwrap()
}

fn recalculate_and_commit(persistence: &mut Persistence, window: DateRange) -> MergeCommit {
    let roster: Roster = create_test_roster();
    let holidays: HolidaySet = persistence.holiday_set().unwrap();
    let absences: AbsenceCalendar = persistence.absence_calendar().unwrap();
    let options: EngineOptions = EngineOptions::default();
    let history: AssignmentMatrix = persistence
        .load_history(window, options.lookback_days)
        .unwrap();
    let inputs: ScheduleInputs<'_> = ScheduleInputs {
        window,
        roster: &roster,
        holidays: &holidays,
        absences: &absences,
        history: &history,
        options,
    };
    let result: Recalculation = recalculate(&inputs).unwrap();
    persistence.apply_merge_plan(&result.plan, 7).unwrap()
}

#[test]
fn test_upsert_assignment_replaces_by_composite_id() {
    let mut persistence: Persistence = create_test_persistence();
    let day = date!(2026 - 03 - 02);
    persistence
        .upsert_assignment(&create_test_assignment(day, "a", StatusKind::Remote))
        .unwrap();
    persistence
        .upsert_assignment(
            &create_test_assignment(day, "a", StatusKind::Absent(AbsenceReason::DayOff))
                .with_note(Some("dentist".to_string())),
        )
        .unwrap();

    let stored: Vec<DailyAssignment> = persistence
        .list_assignments(DateRange::new(day, day).unwrap())
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].status, StatusKind::Absent(AbsenceReason::DayOff));
    assert_eq!(stored[0].note.as_deref(), Some("dentist"));
}

#[test]
fn test_list_assignments_is_window_bounded_and_ordered() {
    let mut persistence: Persistence = create_test_persistence();
    for (day, id) in [
        (date!(2026 - 03 - 03), "b"),
        (date!(2026 - 02 - 27), "a"),
        (date!(2026 - 03 - 03), "a"),
        (date!(2026 - 04 - 01), "a"),
    ] {
        persistence
            .upsert_assignment(&create_test_assignment(day, id, StatusKind::OnSite))
            .unwrap();
    }

    let ids: Vec<String> = persistence
        .list_assignments(march())
        .unwrap()
        .iter()
        .map(|a| a.id().to_string())
        .collect();
    assert_eq!(ids, vec!["2026-03-03-a", "2026-03-03-b"]);
}

#[test]
fn test_apply_merge_plan_writes_in_batches() {
    let mut persistence: Persistence = create_test_persistence();
    let commit: MergeCommit = recalculate_and_commit(&mut persistence, march());

    // 22 workdays in March 2026, five people each.
    assert_eq!(commit.upserts, 110);
    assert_eq!(commit.deletions, 0);
    assert_eq!(commit.batches, 110_usize.div_ceil(7));
    assert_eq!(persistence.count_assignments().unwrap(), 110);
}

#[test]
fn test_recalculation_round_trip_is_idempotent() {
    let mut persistence: Persistence = create_test_persistence();
    recalculate_and_commit(&mut persistence, march());
    let before: Vec<DailyAssignment> = persistence.list_assignments(march()).unwrap();

    let second: MergeCommit = recalculate_and_commit(&mut persistence, march());
    assert_eq!(second, MergeCommit::default());
    assert_eq!(persistence.list_assignments(march()).unwrap(), before);
}

#[test]
fn test_recalculation_after_absence_deletes_and_replaces() {
    let mut persistence: Persistence = create_test_persistence();
    recalculate_and_commit(&mut persistence, march());

    persistence
        .insert_absence(&super::create_test_absence("a", date!(2026 - 03 - 16), 1))
        .unwrap();
    let window: DateRange = DateRange::new(date!(2026 - 03 - 16), date!(2026 - 03 - 31)).unwrap();
    let commit: MergeCommit = recalculate_and_commit(&mut persistence, window);
    assert!(commit.upserts > 0);

    let day: Vec<DailyAssignment> = persistence
        .list_assignments(DateRange::new(date!(2026 - 03 - 16), date!(2026 - 03 - 16)).unwrap())
        .unwrap();
    assert_eq!(day.len(), 5);
    assert!(day.iter().any(|a| a.person_id.value() == "a"
        && a.status == StatusKind::Absent(AbsenceReason::Vacation)));
    assert_eq!(
        day.iter()
            .filter(|a| a.status == StatusKind::OnSite)
            .count(),
        2
    );
}

#[test]
fn test_failed_batch_rolls_back_whole_plan() {
    let mut persistence: Persistence = create_test_persistence();
    diesel::sql_query(
        "CREATE TRIGGER reject_ghost BEFORE INSERT ON assignments \
         WHEN NEW.person_id = 'ghost' BEGIN SELECT RAISE(ABORT, 'ghost write'); END",
    )
    .execute(&mut persistence.conn)
    .unwrap();

    let day = date!(2026 - 03 - 02);
    let plan: MergePlan = MergePlan {
        deletions: Vec::new(),
        upserts: vec![
            create_test_assignment(day, "a", StatusKind::OnSite),
            create_test_assignment(day, "b", StatusKind::Remote),
            create_test_assignment(day, "ghost", StatusKind::Remote),
        ],
    };

    let result = persistence.apply_merge_plan(&plan, 1);
    assert!(matches!(
        result,
        Err(PersistenceError::BatchCommitFailed {
            batch: 3,
            total: 3,
            ..
        })
    ));
    assert_eq!(persistence.count_assignments().unwrap(), 0);
}

#[test]
fn test_rejected_row_undoes_deletions_and_earlier_rows_of_its_batch() {
    let mut persistence: Persistence = create_test_persistence();
    let day = date!(2026 - 03 - 02);
    let stale: DailyAssignment = create_test_assignment(day, "a", StatusKind::OnSite);
    persistence.upsert_assignment(&stale).unwrap();
    diesel::sql_query(
        "CREATE TRIGGER reject_ghost BEFORE INSERT ON assignments \
         WHEN NEW.person_id = 'ghost' BEGIN SELECT RAISE(ABORT, 'ghost write'); END",
    )
    .execute(&mut persistence.conn)
    .unwrap();

    let plan: MergePlan = MergePlan {
        deletions: vec![stale.id()],
        upserts: vec![
            create_test_assignment(day, "b", StatusKind::OnSite),
            create_test_assignment(day, "ghost", StatusKind::Remote),
            create_test_assignment(day, "c", StatusKind::Remote),
        ],
    };

    let result = persistence.apply_merge_plan(&plan, 500);
    assert!(matches!(
        result,
        Err(PersistenceError::BatchCommitFailed {
            batch: 1,
            total: 1,
            ..
        })
    ));
    let stored: Vec<DailyAssignment> = persistence
        .list_assignments(DateRange::new(day, day).unwrap())
        .unwrap();
    assert_eq!(stored, vec![stale]);
}

#[test]
fn test_apply_merge_plan_rejects_zero_batch_size() {
    let mut persistence: Persistence = create_test_persistence();
    let plan: MergePlan = MergePlan {
        deletions: Vec::new(),
        upserts: vec![create_test_assignment(
            date!(2026 - 03 - 02),
            "a",
            StatusKind::OnSite,
        )],
    };
    assert!(matches!(
        persistence.apply_merge_plan(&plan, 0),
        Err(PersistenceError::InvalidMergePlan(_))
    ));
    assert_eq!(persistence.count_assignments().unwrap(), 0);
}
