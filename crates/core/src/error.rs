// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rota_domain::DomainError;

/// Errors that can occur while computing or merging a schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// A computed assignment names a person outside the roster.
    UnmanagedAssignment(String),
    /// A computed assignment is dated outside the recalculated window.
    AssignmentOutsideWindow(String),
    /// A write batch size of zero was requested.
    InvalidBatchSize,
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::UnmanagedAssignment(id) => {
                write!(f, "Assignment {id} belongs to a person outside the roster")
            }
            Self::AssignmentOutsideWindow(id) => {
                write!(f, "Assignment {id} is outside the recalculated window")
            }
            Self::InvalidBatchSize => write!(f, "Write batch size must be at least 1"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
