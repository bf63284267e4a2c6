// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    AbsenceReason, DailyAssignment, DomainError, Person, PersonId, Role, StatusKind,
    validate_assignment_override, validate_lookback_days, validate_person_fields,
};
use time::macros::date;

fn create_test_person(name: &str) -> Person {
    Person::new(PersonId::new("andre").unwrap(), name.to_string(), Role::Rotating)
}

fn create_test_assignment(status: StatusKind) -> DailyAssignment {
    DailyAssignment::new(date!(2026 - 03 - 02), PersonId::new("andre").unwrap(), status)
}

#[test]
fn test_validate_person_fields_accepts_valid_person() {
    let person: Person = create_test_person("Andre");
    assert!(validate_person_fields(&person).is_ok());
}

#[test]
fn test_validate_person_fields_rejects_blank_name() {
    let person: Person = create_test_person("   ");
    let result: Result<(), DomainError> = validate_person_fields(&person);
    assert!(matches!(result, Err(DomainError::InvalidName(_))));
}

#[test]
fn test_validate_assignment_override_accepts_presence_and_absence() {
    for status in [
        StatusKind::OnSite,
        StatusKind::Remote,
        StatusKind::Absent(AbsenceReason::Medical),
    ] {
        assert!(validate_assignment_override(&create_test_assignment(status)).is_ok());
    }
}

#[test]
fn test_validate_assignment_override_rejects_non_workday() {
    let result: Result<(), DomainError> =
        validate_assignment_override(&create_test_assignment(StatusKind::NonWorkday));
    assert!(matches!(result, Err(DomainError::InvalidStatusKind(_))));
}

#[test]
fn test_validate_lookback_days_bounds() {
    assert!(validate_lookback_days(1).is_ok());
    assert!(validate_lookback_days(30).is_ok());
    assert!(validate_lookback_days(366).is_ok());
    assert_eq!(validate_lookback_days(0), Err(DomainError::InvalidLookback(0)));
    assert_eq!(validate_lookback_days(367), Err(DomainError::InvalidLookback(367)));
}
