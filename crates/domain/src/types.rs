// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::date_format::{format_date, parse_date};
use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Date;

/// Represents a team member's stable identifier.
///
/// Identifiers are compared verbatim. They may contain `-`, since the
/// composite assignment id is split on the fixed-width date prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId {
    value: String,
}

impl PersonId {
    /// Creates a new `PersonId`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty or contains whitespace.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        if value.is_empty() {
            return Err(DomainError::InvalidPersonId(String::from(
                "Person id cannot be empty",
            )));
        }
        if value.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidPersonId(format!(
                "Person id '{value}' cannot contain whitespace"
            )));
        }
        Ok(Self {
            value: value.to_string(),
        })
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

/// The scheduling role of a team member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Always expected on-site on workdays, barring absence.
    Fixed,
    /// Member of the pool sharing the rotating on-site slot.
    Rotating,
}

impl Role {
    /// Converts this role to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Rotating => "rotating",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(Self::Fixed),
            "rotating" => Ok(Self::Rotating),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

/// A team member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Stable identifier.
    pub id: PersonId,
    /// Display name.
    pub name: String,
    /// Scheduling role.
    pub role: Role,
}

impl Person {
    /// Creates a new `Person`.
    #[must_use]
    pub const fn new(id: PersonId, name: String, role: Role) -> Self {
        Self { id, name, role }
    }
}

/// Why a person is away on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceReason {
    /// Planned vacation.
    Vacation,
    /// Medical certificate.
    Medical,
    /// Other formal leave.
    Leave,
    /// Compensatory day off.
    DayOff,
    /// Anything else that blocks presence.
    Other,
}

impl AbsenceReason {
    /// Converts this reason to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Vacation => "vacation",
            Self::Medical => "medical",
            Self::Leave => "leave",
            Self::DayOff => "day_off",
            Self::Other => "other",
        }
    }
}

impl FromStr for AbsenceReason {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vacation" => Ok(Self::Vacation),
            "medical" => Ok(Self::Medical),
            "leave" => Ok(Self::Leave),
            "day_off" => Ok(Self::DayOff),
            "other" => Ok(Self::Other),
            _ => Err(DomainError::InvalidStatusKind(s.to_string())),
        }
    }
}

/// The classification of a person's day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatusKind {
    /// Physically present.
    OnSite,
    /// Working remotely.
    Remote,
    /// Away for the given reason.
    Absent(AbsenceReason),
    /// Weekend or holiday. Normally never materialized.
    NonWorkday,
}

impl StatusKind {
    /// Whether this status makes the person unavailable for rotation.
    #[must_use]
    pub const fn blocks_rotation(&self) -> bool {
        match self {
            Self::Absent(_) => true,
            Self::OnSite | Self::Remote | Self::NonWorkday => false,
        }
    }

    /// Whether the rotation engine owns this status and may overwrite it.
    #[must_use]
    pub const fn is_mutable(&self) -> bool {
        match self {
            Self::OnSite | Self::Remote => true,
            Self::Absent(_) | Self::NonWorkday => false,
        }
    }

    /// Returns the absence reason, if this is an absence.
    #[must_use]
    pub const fn absence_reason(&self) -> Option<AbsenceReason> {
        match self {
            Self::Absent(reason) => Some(*reason),
            Self::OnSite | Self::Remote | Self::NonWorkday => None,
        }
    }

    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OnSite => "on_site",
            Self::Remote => "remote",
            Self::Absent(reason) => reason.as_str(),
            Self::NonWorkday => "non_workday",
        }
    }
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on_site" => Ok(Self::OnSite),
            "remote" => Ok(Self::Remote),
            "non_workday" => Ok(Self::NonWorkday),
            other => other.parse::<AbsenceReason>().map(Self::Absent),
        }
    }
}

impl TryFrom<String> for StatusKind {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StatusKind> for String {
    fn from(value: StatusKind) -> Self {
        value.as_str().to_string()
    }
}

/// Identity of a daily assignment: one record per `(date, person)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssignmentId {
    /// The calendar date. Ordered first so ids sort chronologically.
    pub date: Date,
    /// The person.
    pub person_id: PersonId,
}

impl AssignmentId {
    /// Creates a new `AssignmentId`.
    #[must_use]
    pub const fn new(date: Date, person_id: PersonId) -> Self {
        Self { date, person_id }
    }
}

impl std::fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", format_date(self.date), self.person_id)
    }
}

impl FromStr for AssignmentId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "YYYY-MM-DD-<person>": the date prefix is always 10 characters.
        let (date_part, rest) = s
            .split_at_checked(10)
            .ok_or_else(|| DomainError::InvalidAssignmentId(s.to_string()))?;
        let person_part: &str = rest
            .strip_prefix('-')
            .ok_or_else(|| DomainError::InvalidAssignmentId(s.to_string()))?;
        let date: Date =
            parse_date(date_part).map_err(|_| DomainError::InvalidAssignmentId(s.to_string()))?;
        let person_id: PersonId =
            PersonId::new(person_part).map_err(|_| DomainError::InvalidAssignmentId(s.to_string()))?;
        Ok(Self { date, person_id })
    }
}

/// The engine's unit of output: one person's status on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAssignment {
    /// The calendar date.
    #[serde(with = "crate::date_format::iso_date")]
    pub date: Date,
    /// The person.
    pub person_id: PersonId,
    /// The day's classification.
    pub status: StatusKind,
    /// Optional free-text note (manual overrides only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl DailyAssignment {
    /// Creates a new assignment without a note.
    #[must_use]
    pub const fn new(date: Date, person_id: PersonId, status: StatusKind) -> Self {
        Self {
            date,
            person_id,
            status,
            note: None,
        }
    }

    /// Returns a copy of this assignment carrying the given note.
    #[must_use]
    pub fn with_note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }

    /// Returns the composite identity of this assignment.
    #[must_use]
    pub fn id(&self) -> AssignmentId {
        AssignmentId::new(self.date, self.person_id.clone())
    }
}
