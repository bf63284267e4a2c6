// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Dates travel as `YYYY-MM-DD` strings.

use rota_domain::{DailyAssignment, Holiday};
use serde::{Deserialize, Serialize};
use time::Date;

/// A roster member as shown by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonInfo {
    /// Stable person identifier.
    pub person_id: String,
    /// Display name.
    pub name: String,
    /// `fixed` or `rotating`.
    pub role: String,
}

/// API response describing the configured team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRosterResponse {
    /// The fixed-role person.
    pub fixed: PersonInfo,
    /// Rotating pool in rotation order.
    pub pool: Vec<PersonInfo>,
    /// The substitute, if configured.
    pub substitute: Option<String>,
    /// The team timezone.
    pub timezone: String,
}

/// API request to recalculate a window.
///
/// `start` defaults to today in the team timezone and `end` to December 31
/// of the start year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecalculateRequest {
    /// First day to recalculate.
    #[serde(default, with = "rota_domain::iso_date::option")]
    pub start: Option<Date>,
    /// Last day to recalculate.
    #[serde(default, with = "rota_domain::iso_date::option")]
    pub end: Option<Date>,
}

/// API response summarizing a committed recalculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecalculateResponse {
    /// First recalculated day.
    #[serde(with = "rota_domain::iso_date")]
    pub start: Date,
    /// Last recalculated day.
    #[serde(with = "rota_domain::iso_date")]
    pub end: Date,
    /// Pool index the rotation resumed from.
    pub starting_cursor: usize,
    /// Workdays in the window.
    pub workdays: usize,
    /// Workdays on which nobody could cover the fixed role.
    pub uncovered_days: Vec<String>,
    /// Workdays on which no pool member was available.
    pub unfilled_slots: Vec<String>,
    /// Assignments deleted.
    pub deletions: usize,
    /// Assignments inserted or replaced.
    pub upserts: usize,
    /// Write batches committed.
    pub batches: usize,
    /// A success message.
    pub message: String,
}

/// API request for an inclusive date window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindowRequest {
    /// First day.
    #[serde(with = "rota_domain::iso_date")]
    pub start: Date,
    /// Last day.
    #[serde(with = "rota_domain::iso_date")]
    pub end: Date,
}

/// API response listing stored assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAssignmentsResponse {
    /// First day of the window.
    #[serde(with = "rota_domain::iso_date")]
    pub start: Date,
    /// Last day of the window.
    #[serde(with = "rota_domain::iso_date")]
    pub end: Date,
    /// Assignments ordered by date then person.
    pub assignments: Vec<DailyAssignment>,
}

/// API request to override one assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetAssignmentRequest {
    /// The day.
    #[serde(with = "rota_domain::iso_date")]
    pub date: Date,
    /// The person.
    pub person_id: String,
    /// The new status, e.g. `remote` or `vacation`.
    pub status: String,
    /// Optional free-text note.
    #[serde(default)]
    pub note: Option<String>,
}

/// API response for an assignment override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetAssignmentResponse {
    /// The composite id `{date}-{person_id}`.
    pub assignment_id: String,
    /// The stored assignment.
    pub assignment: DailyAssignment,
    /// Whether an earlier record was replaced.
    pub replaced: bool,
    /// A success message.
    pub message: String,
}

/// API request to register an absence interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterAbsenceRequest {
    /// Who is absent.
    pub person_id: String,
    /// First absent day.
    #[serde(with = "rota_domain::iso_date")]
    pub start: Date,
    /// Calendar days absent.
    pub length_days: i32,
    /// Reason, e.g. `vacation` or `medical`.
    pub reason: String,
}

/// A stored absence interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceInfo {
    /// Store identifier.
    pub absence_id: i64,
    /// Who is absent.
    pub person_id: String,
    /// First absent day.
    #[serde(with = "rota_domain::iso_date")]
    pub start: Date,
    /// Last absent day.
    #[serde(with = "rota_domain::iso_date")]
    pub end: Date,
    /// Calendar days absent.
    pub length_days: i32,
    /// Reason.
    pub reason: String,
}

/// API response for a registered absence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterAbsenceResponse {
    /// The stored interval.
    pub absence: AbsenceInfo,
    /// A success message.
    pub message: String,
}

/// API response listing absence intervals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAbsencesResponse {
    /// Intervals ordered by person then start.
    pub absences: Vec<AbsenceInfo>,
}

/// API request to import a holiday feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportHolidaysRequest {
    /// The feed. Later entries on an already-listed date are ignored.
    pub holidays: Vec<Holiday>,
}

/// API response for a holiday import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportHolidaysResponse {
    /// Holidays written.
    pub imported: usize,
    /// A success message.
    pub message: String,
}

/// API response listing holidays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListHolidaysResponse {
    /// The year filter, if any.
    pub year: Option<i32>,
    /// Holidays in date order.
    pub holidays: Vec<Holiday>,
}
