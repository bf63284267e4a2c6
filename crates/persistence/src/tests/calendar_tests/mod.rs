// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_test_absence, create_test_persistence, pid};
use crate::{Persistence, PersistenceError};
use rota_domain::{
    AbsenceCalendar, AbsenceInterval, AbsenceReason, Holiday, HolidayCategory, HolidaySet,
    national_holidays,
};
use time::macros::date;

#[test]
fn test_import_holidays_replaces_same_date() {
    let mut persistence: Persistence = create_test_persistence();
    persistence
        .import_holidays(&[Holiday::new(
            date!(2026 - 12 - 25),
            "Xmas".to_string(),
            HolidayCategory::Company,
        )])
        .unwrap();
    persistence
        .import_holidays(&[Holiday::new(
            date!(2026 - 12 - 25),
            "Natal".to_string(),
            HolidayCategory::National,
        )])
        .unwrap();

    let stored: Vec<Holiday> = persistence.list_holidays(None).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Natal");
    assert_eq!(stored[0].category, HolidayCategory::National);
}

#[test]
fn test_list_holidays_filters_by_year() {
    let mut persistence: Persistence = create_test_persistence();
    let mut feed: Vec<Holiday> = national_holidays(2026).unwrap();
    feed.extend(national_holidays(2027).unwrap());
    persistence.import_holidays(&feed).unwrap();

    let only_2026: Vec<Holiday> = persistence.list_holidays(Some(2026)).unwrap();
    assert_eq!(only_2026.len(), national_holidays(2026).unwrap().len());
    assert!(only_2026.iter().all(|h| h.date.year() == 2026));
    assert!(only_2026.windows(2).all(|w| w[0].date < w[1].date));

    let set: HolidaySet = persistence.holiday_set().unwrap();
    assert_eq!(set.len(), feed.len());
    assert!(set.contains(date!(2027 - 01 - 01)));
}

#[test]
fn test_insert_absence_round_trips_and_assigns_ids() {
    let mut persistence: Persistence = create_test_persistence();
    let first: i64 = persistence
        .insert_absence(&create_test_absence("b", date!(2026 - 03 - 09), 5))
        .unwrap();
    let second: i64 = persistence
        .insert_absence(
            &AbsenceInterval::new(pid("f"), date!(2026 - 03 - 02), 1, AbsenceReason::Medical)
                .unwrap(),
        )
        .unwrap();
    assert_ne!(first, second);

    let all: Vec<(i64, AbsenceInterval)> = persistence.list_absences().unwrap();
    assert_eq!(all.len(), 2);
    // Ordered by person: b before f.
    assert_eq!(all[0].0, first);
    assert_eq!(all[0].1.end(), date!(2026 - 03 - 13));
    assert_eq!(all[1].1.reason(), AbsenceReason::Medical);

    let calendar: AbsenceCalendar = persistence.absence_calendar().unwrap();
    assert!(calendar.is_absent(&pid("b"), date!(2026 - 03 - 11)));
    assert!(!calendar.is_absent(&pid("b"), date!(2026 - 03 - 14)));
}

#[test]
fn test_insert_absence_requires_known_person() {
    let mut persistence: Persistence = create_test_persistence();
    let result = persistence.insert_absence(&create_test_absence("ghost", date!(2026 - 03 - 09), 1));
    assert!(matches!(result, Err(PersistenceError::DatabaseError(_))));
    assert!(persistence.list_absences().unwrap().is_empty());
}

#[test]
fn test_list_absences_for_person() {
    let mut persistence: Persistence = create_test_persistence();
    persistence
        .insert_absence(&create_test_absence("a", date!(2026 - 05 - 04), 2))
        .unwrap();
    persistence
        .insert_absence(&create_test_absence("a", date!(2026 - 02 - 02), 3))
        .unwrap();
    persistence
        .insert_absence(&create_test_absence("d", date!(2026 - 02 - 02), 3))
        .unwrap();

    let for_a: Vec<AbsenceInterval> = persistence.list_absences_for(&pid("a")).unwrap();
    assert_eq!(for_a.len(), 2);
    assert_eq!(for_a[0].start(), date!(2026 - 02 - 02));
}
