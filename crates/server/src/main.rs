// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use rota::VerificationReport;
use rota_api::{
    ApiError, DateWindowRequest, GetRosterResponse, ImportHolidaysRequest, ImportHolidaysResponse,
    ListAbsencesResponse, ListAssignmentsResponse, ListHolidaysResponse, RecalculateRequest,
    RecalculateResponse, RegisterAbsenceRequest, RegisterAbsenceResponse, RotaConfig,
    SetAssignmentRequest, SetAssignmentResponse, TeamSettings, get_roster, import_holidays,
    initialize_store, list_absences, list_assignments, list_holidays, recalculate,
    register_absence, seed_default_holidays, set_assignment, verify,
};
use rota_persistence::SqlitePersistence;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Rota Server - HTTP server for the on-site rota
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Path to the team configuration JSON. If not provided, uses the built-in team.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Application state shared across handlers.
///
/// The persistence layer sits behind a Mutex so a recalculation's
/// read-compute-write never interleaves with another write.
#[derive(Clone)]
struct AppState {
    /// The rota store.
    persistence: Arc<Mutex<SqlitePersistence>>,
    /// Validated team configuration.
    settings: Arc<TeamSettings>,
}

/// Query parameters for GET `/holidays`.
#[derive(Debug, Deserialize)]
struct ListHolidaysQuery {
    /// Restrict to one calendar year.
    year: Option<i32>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Handler for GET `/roster` endpoint.
async fn handle_get_roster(
    AxumState(app_state): AxumState<AppState>,
) -> Json<GetRosterResponse> {
    Json(get_roster(&app_state.settings))
}

/// Handler for POST `/recalculate` endpoint.
///
/// Recomputes a window and commits the merge. Send `{}` to recalculate
/// from today through the end of the year.
async fn handle_recalculate(
    AxumState(app_state): AxumState<AppState>,
    Json(request): Json<RecalculateRequest>,
) -> Result<Json<RecalculateResponse>, HttpError> {
    info!(start = ?request.start, end = ?request.end, "Handling recalculate request");

    let mut persistence = app_state.persistence.lock().await;
    let response: RecalculateResponse =
        recalculate(&mut persistence, &app_state.settings, &request)?;
    Ok(Json(response))
}

/// Handler for GET `/assignments` endpoint.
async fn handle_list_assignments(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<DateWindowRequest>,
) -> Result<Json<ListAssignmentsResponse>, HttpError> {
    info!(start = %query.start, end = %query.end, "Handling list_assignments request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_assignments(&mut persistence, &query)?))
}

/// Handler for PUT `/assignments` endpoint.
async fn handle_set_assignment(
    AxumState(app_state): AxumState<AppState>,
    Json(request): Json<SetAssignmentRequest>,
) -> Result<Json<SetAssignmentResponse>, HttpError> {
    info!(
        date = %request.date,
        person_id = %request.person_id,
        status = %request.status,
        "Handling set_assignment request"
    );

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(set_assignment(&mut persistence, &request)?))
}

/// Handler for POST `/absences` endpoint.
async fn handle_register_absence(
    AxumState(app_state): AxumState<AppState>,
    Json(request): Json<RegisterAbsenceRequest>,
) -> Result<Json<RegisterAbsenceResponse>, HttpError> {
    info!(
        person_id = %request.person_id,
        start = %request.start,
        length_days = request.length_days,
        "Handling register_absence request"
    );

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(register_absence(&mut persistence, &request)?))
}

/// Handler for GET `/absences` endpoint.
async fn handle_list_absences(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListAbsencesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_absences(&mut persistence)?))
}

/// Handler for POST `/holidays` endpoint.
async fn handle_import_holidays(
    AxumState(app_state): AxumState<AppState>,
    Json(request): Json<ImportHolidaysRequest>,
) -> Result<Json<ImportHolidaysResponse>, HttpError> {
    info!(count = request.holidays.len(), "Handling import_holidays request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(import_holidays(&mut persistence, &request)?))
}

/// Handler for POST `/holidays/defaults/{year}` endpoint.
async fn handle_seed_default_holidays(
    AxumState(app_state): AxumState<AppState>,
    Path(year): Path<i32>,
) -> Result<Json<ImportHolidaysResponse>, HttpError> {
    info!(year, "Handling seed_default_holidays request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(seed_default_holidays(
        &mut persistence,
        &app_state.settings,
        year,
    )?))
}

/// Handler for GET `/holidays` endpoint.
async fn handle_list_holidays(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ListHolidaysQuery>,
) -> Result<Json<ListHolidaysResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_holidays(&mut persistence, query.year)?))
}

/// Handler for GET `/verify` endpoint.
async fn handle_verify(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<DateWindowRequest>,
) -> Result<Json<VerificationReport>, HttpError> {
    info!(start = %query.start, end = %query.end, "Handling verify request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(verify(&mut persistence, &app_state.settings, &query)?))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/roster", get(handle_get_roster))
        .route("/recalculate", post(handle_recalculate))
        .route(
            "/assignments",
            get(handle_list_assignments).put(handle_set_assignment),
        )
        .route(
            "/absences",
            get(handle_list_absences).post(handle_register_absence),
        )
        .route(
            "/holidays",
            get(handle_list_holidays).post(handle_import_holidays),
        )
        .route(
            "/holidays/defaults/{year}",
            post(handle_seed_default_holidays),
        )
        .route("/verify", get(handle_verify))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Rota Server");

    let config: RotaConfig = if let Some(path) = &args.config {
        info!(path = %path.display(), "Loading team configuration");
        RotaConfig::load(path)?
    } else {
        info!("Using built-in team configuration");
        RotaConfig::default()
    };
    let settings: TeamSettings = config.into_settings()?;

    let mut persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };
    initialize_store(&mut persistence, &settings)?;

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        settings: Arc::new(settings),
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use rota_api::MemberConfig;
    use serde_json::Value;
    use tower::ServiceExt;

    /// Helper to create test app state: fixed `f`, pool `a, b, c, d`, substitute `c`.
    fn create_test_app_state() -> AppState {
        let member = |id: &str| MemberConfig {
            id: id.to_string(),
            name: id.to_uppercase(),
        };
        let settings: TeamSettings = RotaConfig {
            timezone: String::from("UTC"),
            fixed: member("f"),
            pool: vec![member("a"), member("b"), member("c"), member("d")],
            substitute: Some(String::from("c")),
            ..RotaConfig::default()
        }
        .into_settings()
        .expect("Failed to build test settings");

        let mut persistence: SqlitePersistence =
            SqlitePersistence::new_in_memory().expect("Failed to create in-memory persistence");
        initialize_store(&mut persistence, &settings).expect("Failed to initialize store");

        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            settings: Arc::new(settings),
        }
    }

    fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (HttpStatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status: HttpStatusCode = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body_bytes).unwrap())
    }

    #[tokio::test]
    async fn test_get_roster() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(&app, get_request("/roster")).await;
        assert_eq!(status, HttpStatusCode::OK);

        let roster: GetRosterResponse = serde_json::from_value(body).unwrap();
        assert_eq!(roster.fixed.person_id, "f");
        assert_eq!(roster.pool.len(), 4);
        assert_eq!(roster.substitute.as_deref(), Some("c"));
    }

    #[tokio::test]
    async fn test_recalculate_then_list_and_verify() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/recalculate",
                &serde_json::json!({"start": "2026-03-02", "end": "2026-03-31"}),
            ),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        let summary: RecalculateResponse = serde_json::from_value(body).unwrap();
        assert_eq!(summary.workdays, 22);
        assert_eq!(summary.upserts, 110);

        let (status, body) = send(
            &app,
            get_request("/assignments?start=2026-03-02&end=2026-03-02"),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        let listed: ListAssignmentsResponse = serde_json::from_value(body).unwrap();
        assert_eq!(listed.assignments.len(), 5);
        assert_eq!(
            listed
                .assignments
                .iter()
                .filter(|a| a.status.as_str() == "on_site")
                .count(),
            2
        );

        let (status, body) = send(
            &app,
            get_request("/verify?start=2026-03-02&end=2026-03-31"),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["workdays_checked"], 22);
        assert_eq!(body["violations"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_recalculate_rejects_inverted_window() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/recalculate",
                &serde_json::json!({"start": "2026-03-31", "end": "2026-03-02"}),
            ),
        )
        .await;
        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        assert_eq!(body["error"], true);
    }

    #[tokio::test]
    async fn test_absence_registration_errors_map_to_status_codes() {
        let app: Router = build_router(create_test_app_state());
        let absence = |person: &str, start: &str| {
            serde_json::json!({
                "person_id": person,
                "start": start,
                "length_days": 3,
                "reason": "vacation",
            })
        };

        let (status, _) = send(
            &app,
            json_request("POST", "/absences", &absence("b", "2026-03-09")),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        let (status, _) = send(
            &app,
            json_request("POST", "/absences", &absence("b", "2026-03-10")),
        )
        .await;
        assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(
            &app,
            json_request("POST", "/absences", &absence("zed", "2026-03-10")),
        )
        .await;
        assert_eq!(status, HttpStatusCode::NOT_FOUND);

        let (status, body) = send(&app, get_request("/absences")).await;
        assert_eq!(status, HttpStatusCode::OK);
        let listed: ListAbsencesResponse = serde_json::from_value(body).unwrap();
        assert_eq!(listed.absences.len(), 1);
        assert_eq!(listed.absences[0].end, time::macros::date!(2026 - 03 - 11));
    }

    #[tokio::test]
    async fn test_set_assignment_rejects_non_workday_status() {
        let app: Router = build_router(create_test_app_state());

        let (status, _) = send(
            &app,
            json_request(
                "PUT",
                "/assignments",
                &serde_json::json!({
                    "date": "2026-03-02",
                    "person_id": "a",
                    "status": "non_workday",
                }),
            ),
        )
        .await;
        assert_eq!(status, HttpStatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            json_request(
                "PUT",
                "/assignments",
                &serde_json::json!({
                    "date": "2026-03-02",
                    "person_id": "a",
                    "status": "remote",
                    "note": "wfh",
                }),
            ),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["assignment_id"], "2026-03-02-a");
        assert_eq!(body["assignment"]["note"], "wfh");
    }

    #[tokio::test]
    async fn test_holiday_endpoints() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(
            &app,
            json_request("POST", "/holidays/defaults/2026", &serde_json::json!({})),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        // 13 national plus the two recurring São Paulo dates.
        assert_eq!(body["imported"], 15);

        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/holidays",
                &serde_json::json!({"holidays": [
                    {"date": "2027-07-09", "name": "Founders Day", "category": "company"}
                ]}),
            ),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        let (_, body) = send(&app, get_request("/holidays?year=2026")).await;
        let listed: ListHolidaysResponse = serde_json::from_value(body).unwrap();
        assert_eq!(listed.holidays.len(), 15);
        assert!(
            listed
                .holidays
                .iter()
                .any(|h| h.date == time::macros::date!(2026 - 07 - 09))
        );

        let (_, body) = send(&app, get_request("/holidays")).await;
        let listed: ListHolidaysResponse = serde_json::from_value(body).unwrap();
        assert_eq!(listed.holidays.len(), 16);
    }
}
