// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::config::ConfigError;
use rota::CoreError;
use rota_domain::DomainError;
use rota_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid(domain_err) => translate_domain_error(domain_err),
            other => Self::InvalidInput {
                field: String::from("config"),
                message: other.to_string(),
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidPersonId(msg) => ApiError::InvalidInput {
            field: String::from("person_id"),
            message: msg,
        },
        DomainError::InvalidName(msg) => ApiError::InvalidInput {
            field: String::from("name"),
            message: msg,
        },
        DomainError::DuplicatePerson(id) => ApiError::DomainRuleViolation {
            rule: String::from("unique_person"),
            message: format!("Person '{id}' appears more than once in the roster"),
        },
        DomainError::InvalidFixedCount { count } => ApiError::DomainRuleViolation {
            rule: String::from("single_fixed_person"),
            message: format!("Roster must contain exactly one fixed person, found {count}"),
        },
        DomainError::EmptyPool => ApiError::DomainRuleViolation {
            rule: String::from("non_empty_pool"),
            message: String::from("The rotating pool must have at least one member"),
        },
        DomainError::SubstituteNotInPool(id) => ApiError::DomainRuleViolation {
            rule: String::from("substitute_in_pool"),
            message: format!("Substitute '{id}' is not a member of the rotating pool"),
        },
        DomainError::InvalidDateRange { start, end } => ApiError::InvalidInput {
            field: String::from("end"),
            message: format!("End date {end} is before start date {start}"),
        },
        DomainError::InvalidAbsenceLength {
            person_id,
            start,
            length_days,
        } => ApiError::InvalidInput {
            field: String::from("length_days"),
            message: format!(
                "Absence for '{person_id}' starting {start} must last at least one day, got {length_days}"
            ),
        },
        err @ DomainError::OverlappingAbsence { .. } => ApiError::DomainRuleViolation {
            rule: String::from("non_overlapping_absence"),
            message: err.to_string(),
        },
        DomainError::InvalidStatusKind(msg) => ApiError::InvalidInput {
            field: String::from("status"),
            message: msg,
        },
        DomainError::InvalidRole(msg) => ApiError::InvalidInput {
            field: String::from("role"),
            message: msg,
        },
        DomainError::InvalidHolidayCategory(msg) => ApiError::InvalidInput {
            field: String::from("category"),
            message: msg,
        },
        DomainError::InvalidAssignmentId(msg) => ApiError::InvalidInput {
            field: String::from("assignment_id"),
            message: msg,
        },
        DomainError::DateParseError { date_string, error } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Failed to parse date '{date_string}': {error}"),
        },
        DomainError::DateArithmeticOverflow { operation } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Date arithmetic overflow while {operation}"),
        },
        DomainError::InvalidLookback(days) => ApiError::InvalidInput {
            field: String::from("lookback_days"),
            message: format!("Lookback must be between 1 and 366 days, got {days}"),
        },
        DomainError::InvalidRecurringHoliday { month, day } => ApiError::InvalidInput {
            field: String::from("recurring_holidays"),
            message: format!("No such calendar date: month {month}, day {day}"),
        },
        DomainError::InvalidTimezone(tz) => ApiError::InvalidInput {
            field: String::from("timezone"),
            message: format!("Unknown timezone '{tz}'"),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::InvalidBatchSize => ApiError::InvalidInput {
            field: String::from("max_batch_ops"),
            message: String::from("Batch size must be greater than 0"),
        },
        err @ (CoreError::UnmanagedAssignment(_) | CoreError::AssignmentOutsideWindow(_)) => {
            ApiError::Internal {
                message: err.to_string(),
            }
        }
    }
}

/// Translates a persistence error into an API error.
///
/// Batch failures stay internal: the caller recovers by re-running the window.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(msg) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message: msg,
        },
        PersistenceError::InvalidMergePlan(msg) => ApiError::InvalidInput {
            field: String::from("max_batch_ops"),
            message: msg,
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
