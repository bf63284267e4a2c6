// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{DailyAssignment, Person, StatusKind};

/// Validates that a person's basic field constraints are met.
///
/// Uniqueness is checked by the roster, which has the context for it.
///
/// # Arguments
///
/// * `person` - The person to validate
///
/// # Errors
///
/// Returns an error if the person's name is empty or only whitespace.
pub fn validate_person_fields(person: &Person) -> Result<(), DomainError> {
    if person.name.trim().is_empty() {
        return Err(DomainError::InvalidName(format!(
            "Name of '{}' cannot be empty",
            person.id
        )));
    }
    Ok(())
}

/// Validates a manually entered assignment.
///
/// Non-workday is a calendar fact, never a status someone sets by hand.
///
/// # Arguments
///
/// * `assignment` - The assignment to validate
///
/// # Errors
///
/// Returns `DomainError::InvalidStatusKind` if the status is `NonWorkday`.
pub fn validate_assignment_override(assignment: &DailyAssignment) -> Result<(), DomainError> {
    if assignment.status == StatusKind::NonWorkday {
        return Err(DomainError::InvalidStatusKind(format!(
            "{} cannot be set manually",
            StatusKind::NonWorkday
        )));
    }
    Ok(())
}

/// Validates the continuity lookback window.
///
/// # Errors
///
/// Returns `DomainError::InvalidLookback` unless `days` is between 1 and 366.
pub fn validate_lookback_days(days: u32) -> Result<(), DomainError> {
    if !(1..=366).contains(&days) {
        return Err(DomainError::InvalidLookback(days));
    }
    Ok(())
}
