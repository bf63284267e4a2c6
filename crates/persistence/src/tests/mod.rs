// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod assignment_tests;
mod calendar_tests;
mod directory_tests;
mod initialization_tests;

use crate::Persistence;
use rota_domain::{
    AbsenceInterval, AbsenceReason, DailyAssignment, Person, PersonId, Role, Roster, StatusKind,
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

/// An in-memory store with the test roster already synced.
pub fn create_test_persistence() -> Persistence {
    let mut persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory store");
    persistence
        .sync_people(&create_test_roster())
        .expect("Failed to sync roster");
    persistence
}

pub fn create_test_absence(id: &str, start: Date, length_days: i32) -> AbsenceInterval {
    AbsenceInterval::new(pid(id), start, length_days, AbsenceReason::Vacation).unwrap()
}

pub fn create_test_assignment(date: Date, id: &str, status: StatusKind) -> DailyAssignment {
    DailyAssignment::new(date, pid(id), status)
}
