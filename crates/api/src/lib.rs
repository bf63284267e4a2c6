// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the on-site rota.
//!
//! Handlers are transport-neutral: they take the persistence layer and the
//! validated team settings, and return request/response DTOs or an
//! [`ApiError`]. The HTTP server maps these onto routes and status codes.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod config;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use config::{ConfigError, MemberConfig, RotaConfig, TeamSettings};
pub use error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    get_roster, import_holidays, initialize_store, list_absences, list_assignments,
    list_holidays, recalculate, register_absence, seed_default_holidays, set_assignment, verify,
};
pub use request_response::{
    AbsenceInfo, DateWindowRequest, GetRosterResponse, ImportHolidaysRequest,
    ImportHolidaysResponse, ListAbsencesResponse, ListAssignmentsResponse, ListHolidaysResponse,
    PersonInfo, RecalculateRequest, RecalculateResponse, RegisterAbsenceRequest,
    RegisterAbsenceResponse, SetAssignmentRequest, SetAssignmentResponse,
};
