// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.

use rota::{
    AssignmentMatrix, Recalculation, ScheduleInputs, VerificationReport,
    recalculate as recalculate_schedule, verify_schedule,
};
use rota_domain::{
    AbsenceCalendar, AbsenceInterval, AbsenceReason, DailyAssignment, DateRange, DomainError,
    Holiday, HolidaySet, Person, PersonId, StatusKind, format_date, holidays_for_year,
    merge_holiday_feeds, validate_assignment_override, validate_no_overlap,
};
use rota_persistence::{MergeCommit, SqlitePersistence};
use time::Date;
use tracing::info;

use crate::config::TeamSettings;
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    AbsenceInfo, DateWindowRequest, GetRosterResponse, ImportHolidaysRequest,
    ImportHolidaysResponse, ListAbsencesResponse, ListAssignmentsResponse, ListHolidaysResponse,
    PersonInfo, RecalculateRequest, RecalculateResponse, RegisterAbsenceRequest,
    RegisterAbsenceResponse, SetAssignmentRequest, SetAssignmentResponse,
};

fn person_info(person: &Person) -> PersonInfo {
    PersonInfo {
        person_id: person.id.to_string(),
        name: person.name.clone(),
        role: person.role.as_str().to_string(),
    }
}

fn absence_info(absence_id: i64, interval: &AbsenceInterval) -> AbsenceInfo {
    AbsenceInfo {
        absence_id,
        person_id: interval.person_id().to_string(),
        start: interval.start(),
        end: interval.end(),
        length_days: interval.length_days(),
        reason: interval.reason().as_str().to_string(),
    }
}

fn window_of(start: Date, end: Date) -> Result<DateRange, ApiError> {
    DateRange::new(start, end).map_err(translate_domain_error)
}

/// Resolves a person id and checks the directory knows it.
fn known_person(
    persistence: &mut SqlitePersistence,
    person_id: &str,
) -> Result<PersonId, ApiError> {
    let id: PersonId = PersonId::new(person_id).map_err(translate_domain_error)?;
    if !persistence
        .person_exists(&id)
        .map_err(translate_persistence_error)?
    {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Person"),
            message: format!("Person '{id}' is not in the directory"),
        });
    }
    Ok(id)
}

/// Prepares the store for a team: syncs the person directory and imports
/// the configured extra holidays.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `settings` - The validated team configuration
///
/// # Errors
///
/// Returns an error if either write fails.
pub fn initialize_store(
    persistence: &mut SqlitePersistence,
    settings: &TeamSettings,
) -> Result<(), ApiError> {
    persistence
        .sync_people(&settings.roster)
        .map_err(translate_persistence_error)?;
    if !settings.extra_holidays.is_empty() {
        let feed: Vec<Holiday> = merge_holiday_feeds([settings.extra_holidays.clone()]);
        persistence
            .import_holidays(&feed)
            .map_err(translate_persistence_error)?;
    }
    Ok(())
}

/// Describes the configured team.
#[must_use]
pub fn get_roster(settings: &TeamSettings) -> GetRosterResponse {
    GetRosterResponse {
        fixed: person_info(settings.roster.fixed()),
        pool: settings.roster.pool().iter().map(person_info).collect(),
        substitute: settings.roster.substitute().map(ToString::to_string),
        timezone: settings.clock.timezone().to_string(),
    }
}

/// Recalculates a window and commits the result.
///
/// Missing bounds default to today in the team timezone and December 31 of
/// the start year.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `settings` - The validated team configuration
/// * `request` - Optional window bounds
///
/// # Errors
///
/// Returns an error if:
/// - The window is inverted
/// - Today cannot be resolved in the team timezone
/// - The engine rejects its inputs
/// - The merge fails to commit; nothing is written and the window can be re-run
pub fn recalculate(
    persistence: &mut SqlitePersistence,
    settings: &TeamSettings,
    request: &RecalculateRequest,
) -> Result<RecalculateResponse, ApiError> {
    let start: Date = match request.start {
        Some(start) => start,
        None => settings.clock.today().map_err(translate_domain_error)?,
    };
    let window: DateRange = match request.end {
        Some(end) => window_of(start, end)?,
        None => DateRange::through_end_of_year(start),
    };

    let holidays: HolidaySet = persistence
        .holiday_set()
        .map_err(translate_persistence_error)?;
    let absences: AbsenceCalendar = persistence
        .absence_calendar()
        .map_err(translate_persistence_error)?;
    let history: AssignmentMatrix = persistence
        .load_history(window, settings.engine.lookback_days)
        .map_err(translate_persistence_error)?;

    let inputs: ScheduleInputs<'_> = ScheduleInputs {
        window,
        roster: &settings.roster,
        holidays: &holidays,
        absences: &absences,
        history: &history,
        options: settings.engine,
    };
    let result: Recalculation = recalculate_schedule(&inputs).map_err(translate_core_error)?;
    let commit: MergeCommit = persistence
        .apply_merge_plan(&result.plan, settings.max_batch_ops)
        .map_err(translate_persistence_error)?;

    Ok(RecalculateResponse {
        start: window.start(),
        end: window.end(),
        starting_cursor: result.schedule.starting_cursor,
        workdays: result.schedule.workdays,
        uncovered_days: result
            .schedule
            .uncovered_days
            .iter()
            .copied()
            .map(format_date)
            .collect(),
        unfilled_slots: result
            .schedule
            .unfilled_slots
            .iter()
            .copied()
            .map(format_date)
            .collect(),
        deletions: commit.deletions,
        upserts: commit.upserts,
        batches: commit.batches,
        message: format!(
            "Recalculated {} through {}",
            window.start(),
            window.end()
        ),
    })
}

/// Lists stored assignments in a window.
///
/// # Errors
///
/// Returns an error if the window is inverted or the query fails.
pub fn list_assignments(
    persistence: &mut SqlitePersistence,
    request: &DateWindowRequest,
) -> Result<ListAssignmentsResponse, ApiError> {
    let window: DateRange = window_of(request.start, request.end)?;
    let assignments: Vec<DailyAssignment> = persistence
        .list_assignments(window)
        .map_err(translate_persistence_error)?;

    Ok(ListAssignmentsResponse {
        start: window.start(),
        end: window.end(),
        assignments,
    })
}

/// Overrides one person's status on one day.
///
/// The record replaces whatever is stored under the same composite id.
/// Absence statuses set this way block the rotation on later
/// recalculations; `on_site` and `remote` are overwritten by them.
///
/// # Errors
///
/// Returns an error if:
/// - The person is not in the directory
/// - The status is unknown or is `non_workday`
/// - The write fails
pub fn set_assignment(
    persistence: &mut SqlitePersistence,
    request: &SetAssignmentRequest,
) -> Result<SetAssignmentResponse, ApiError> {
    let person_id: PersonId = known_person(persistence, &request.person_id)?;
    let status: StatusKind = request
        .status
        .parse()
        .map_err(translate_domain_error)?;
    let assignment: DailyAssignment =
        DailyAssignment::new(request.date, person_id, status).with_note(request.note.clone());
    validate_assignment_override(&assignment).map_err(translate_domain_error)?;

    let day: DateRange = window_of(request.date, request.date)?;
    let replaced: bool = persistence
        .list_assignments(day)
        .map_err(translate_persistence_error)?
        .iter()
        .any(|a| a.person_id == assignment.person_id);

    persistence
        .upsert_assignment(&assignment)
        .map_err(translate_persistence_error)?;

    let assignment_id: String = assignment.id().to_string();
    info!(assignment_id = %assignment_id, status = %status, replaced, "Assignment overridden");
    Ok(SetAssignmentResponse {
        message: format!("Set {assignment_id} to {status}"),
        assignment_id,
        assignment,
        replaced,
    })
}

/// Registers an absence interval after checking it against the person's
/// existing intervals.
///
/// Stored assignments are not touched; the absence takes effect on the next
/// recalculation covering it.
///
/// # Errors
///
/// Returns an error if:
/// - The person is not in the directory
/// - The reason is unknown or the length is not positive
/// - The interval overlaps one already stored for the person
/// - The write fails
pub fn register_absence(
    persistence: &mut SqlitePersistence,
    request: &RegisterAbsenceRequest,
) -> Result<RegisterAbsenceResponse, ApiError> {
    let person_id: PersonId = known_person(persistence, &request.person_id)?;
    let reason: AbsenceReason =
        request
            .reason
            .parse()
            .map_err(|_: DomainError| ApiError::InvalidInput {
                field: String::from("reason"),
                message: format!("Unknown absence reason '{}'", request.reason),
            })?;
    let interval: AbsenceInterval =
        AbsenceInterval::new(person_id, request.start, request.length_days, reason)
            .map_err(translate_domain_error)?;

    let mut existing: Vec<AbsenceInterval> = persistence
        .list_absences_for(interval.person_id())
        .map_err(translate_persistence_error)?;
    existing.push(interval.clone());
    validate_no_overlap(&existing).map_err(translate_domain_error)?;

    let absence_id: i64 = persistence
        .insert_absence(&interval)
        .map_err(translate_persistence_error)?;

    Ok(RegisterAbsenceResponse {
        message: format!(
            "Registered {} absence for {} from {} through {}",
            interval.reason().as_str(),
            interval.person_id(),
            interval.start(),
            interval.end()
        ),
        absence: absence_info(absence_id, &interval),
    })
}

/// Lists every stored absence interval.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_absences(
    persistence: &mut SqlitePersistence,
) -> Result<ListAbsencesResponse, ApiError> {
    let absences: Vec<AbsenceInfo> = persistence
        .list_absences()
        .map_err(translate_persistence_error)?
        .iter()
        .map(|(id, interval)| absence_info(*id, interval))
        .collect();
    Ok(ListAbsencesResponse { absences })
}

/// Imports a holiday feed.
///
/// Duplicate dates inside the feed keep their first entry; dates already
/// stored are replaced.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn import_holidays(
    persistence: &mut SqlitePersistence,
    request: &ImportHolidaysRequest,
) -> Result<ImportHolidaysResponse, ApiError> {
    let feed: Vec<Holiday> = merge_holiday_feeds([request.holidays.clone()]);
    let imported: usize = persistence
        .import_holidays(&feed)
        .map_err(translate_persistence_error)?;
    Ok(ImportHolidaysResponse {
        imported,
        message: format!("Imported {imported} holidays"),
    })
}

/// Seeds the built-in national holidays for a year, followed by the
/// configured recurring state and municipal holidays.
///
/// # Errors
///
/// Returns an error if the year is out of range or the write fails.
pub fn seed_default_holidays(
    persistence: &mut SqlitePersistence,
    settings: &TeamSettings,
    year: i32,
) -> Result<ImportHolidaysResponse, ApiError> {
    let feed: Vec<Holiday> =
        holidays_for_year(year, &settings.recurring_holidays).map_err(translate_domain_error)?;
    info!(year, count = feed.len(), "Seeding default holidays");
    let imported: usize = persistence
        .import_holidays(&feed)
        .map_err(translate_persistence_error)?;
    Ok(ImportHolidaysResponse {
        imported,
        message: format!("Seeded {imported} holidays for {year}"),
    })
}

/// Lists stored holidays, optionally for one year.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_holidays(
    persistence: &mut SqlitePersistence,
    year: Option<i32>,
) -> Result<ListHolidaysResponse, ApiError> {
    let holidays: Vec<Holiday> = persistence
        .list_holidays(year)
        .map_err(translate_persistence_error)?;
    Ok(ListHolidaysResponse { year, holidays })
}

/// Verifies stored assignments in a window against the presence rules.
///
/// # Errors
///
/// Returns an error if the window is inverted or a query fails.
pub fn verify(
    persistence: &mut SqlitePersistence,
    settings: &TeamSettings,
    request: &DateWindowRequest,
) -> Result<VerificationReport, ApiError> {
    let window: DateRange = window_of(request.start, request.end)?;
    let holidays: HolidaySet = persistence
        .holiday_set()
        .map_err(translate_persistence_error)?;
    let matrix: AssignmentMatrix = persistence
        .list_assignments(window)
        .map_err(translate_persistence_error)?
        .into_iter()
        .collect();

    Ok(verify_schedule(
        window,
        &settings.roster,
        &holidays,
        &matrix,
        settings.required_on_site,
    ))
}
