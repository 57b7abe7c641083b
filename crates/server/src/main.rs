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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod fixtures;
mod identity;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use shiftboard_api::{
    ApiError, ApiResult, AvailabilityRequest, AvailabilityResponse, DeleteRegistrationResponse,
    DraftResponse, EditDraftRequest, ForceAssignResponse, ForceShiftRequest,
    ForceUnassignResponse, ListAuditEventsRequest, ListAuditEventsResponse,
    ListRegistrationsRequest, ListRegistrationsResponse, MonthlySummaryRequest,
    MonthlySummaryResponse, PublishDraftResponse, PublishScheduleRequest,
    PublishScheduleResponse, ScheduleSlotInfo, SlotRequest, SubmitRegistrationRequest,
    SubmitRegistrationResponse, ToggleShiftRequest, ToggleShiftResponse, delete_registration,
    discard_draft, edit_draft, force_assign, force_unassign, get_monthly_summary,
    get_schedule_slot, get_week_availability, list_audit_events, list_registrations, open_draft,
    publish_draft, publish_schedule, submit_registration, toggle_registration_shift,
};
use shiftboard_persistence::Persistence;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::fixtures::Fixtures;
use crate::identity::RequestIdentity;

/// Shiftboard Server - HTTP server for shift registration and scheduling
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// JSON file with stores, counters, and employees to load at startup
    #[arg(short, long)]
    fixtures: Option<String>,
}

/// Application state shared across handlers.
///
/// Every request holds the lock for its whole load, apply and commit
/// cycle, so requests against the database are serialized.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
}

/// Error body returned for every failed request.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Machine-readable error category.
    kind: String,
    /// Error message.
    message: String,
    /// Warnings awaiting confirmation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
}

/// Liveness response.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct HealthResponse {
    /// Always "ok".
    status: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// Machine-readable error category.
    kind: &'static str,
    /// The error message.
    message: String,
    /// Warnings awaiting confirmation.
    warnings: Vec<String>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            kind: self.kind.to_string(),
            message: self.message,
            warnings: self.warnings,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let (status, kind): (StatusCode, &'static str) = match &err {
            ApiError::AuthenticationFailed { .. } => {
                (StatusCode::UNAUTHORIZED, "authentication_failed")
            }
            ApiError::Unauthorized { .. } => (StatusCode::FORBIDDEN, "unauthorized"),
            ApiError::Forbidden { .. } => (StatusCode::FORBIDDEN, "forbidden"),
            ApiError::DomainRuleViolation { .. } => (StatusCode::BAD_REQUEST, "validation"),
            ApiError::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "invalid_input"),
            ApiError::CapacityExceeded { .. } => (StatusCode::CONFLICT, "capacity_exceeded"),
            ApiError::Conflict { .. } => (StatusCode::CONFLICT, "conflict"),
            ApiError::RegistrationClosed { .. } => (StatusCode::LOCKED, "registration_closed"),
            ApiError::ConfirmationRequired { .. } => {
                (StatusCode::PRECONDITION_REQUIRED, "confirmation_required")
            }
            ApiError::ResourceNotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        };
        let message: String = err.to_string();
        let warnings: Vec<String> = match err {
            ApiError::ConfirmationRequired { warnings } => warnings,
            _ => Vec::new(),
        };
        Self {
            status,
            kind,
            message,
            warnings,
        }
    }
}

/// Handler for GET `/health` endpoint.
#[allow(clippy::unused_async)]
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
    })
}

/// Handler for POST `/registrations/toggle` endpoint.
///
/// Evaluates one toggle of an unsaved weekly selection. Nothing is saved.
async fn handle_toggle_shift(
    AxumState(app_state): AxumState<AppState>,
    RequestIdentity { actor, .. }: RequestIdentity,
    Json(req): Json<ToggleShiftRequest>,
) -> Result<Json<ToggleShiftResponse>, HttpError> {
    info!(
        employee_id = %actor.employee_id,
        date = %req.date,
        shift_id = %req.shift_id,
        "Handling toggle_shift request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ToggleShiftResponse = toggle_registration_shift(&mut persistence, &req, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/registrations` endpoint.
///
/// Saves the caller's weekly registration.
async fn handle_submit_registration(
    AxumState(app_state): AxumState<AppState>,
    RequestIdentity { actor, cause }: RequestIdentity,
    Json(req): Json<SubmitRegistrationRequest>,
) -> Result<Json<SubmitRegistrationResponse>, HttpError> {
    info!(
        employee_id = %actor.employee_id,
        week_start = %req.week_start,
        shifts = req.shifts.len(),
        confirm_warnings = req.confirm_warnings,
        "Handling submit_registration request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let result: ApiResult<SubmitRegistrationResponse> = submit_registration(
        &mut persistence,
        &req,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    info!(
        event_id = result.response.event_id,
        employee_id = %actor.employee_id,
        "Successfully saved registration"
    );

    Ok(Json(result.response))
}

/// Handler for GET `/registrations` endpoint.
async fn handle_list_registrations(
    AxumState(app_state): AxumState<AppState>,
    RequestIdentity { actor, .. }: RequestIdentity,
    Query(query): Query<ListRegistrationsRequest>,
) -> Result<Json<ListRegistrationsResponse>, HttpError> {
    info!(
        employee_id = %actor.employee_id,
        week_start = %query.week_start,
        filter = ?query.employee_id,
        "Handling list_registrations request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ListRegistrationsResponse =
        list_registrations(&mut persistence, &query, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/registrations/{registration_id}` endpoint.
async fn handle_delete_registration(
    AxumState(app_state): AxumState<AppState>,
    RequestIdentity { actor, cause }: RequestIdentity,
    Path(registration_id): Path<i64>,
) -> Result<Json<DeleteRegistrationResponse>, HttpError> {
    info!(
        employee_id = %actor.employee_id,
        registration_id = registration_id,
        "Handling delete_registration request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let result: ApiResult<DeleteRegistrationResponse> = delete_registration(
        &mut persistence,
        registration_id,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    info!(
        event_id = result.response.event_id,
        registration_id = registration_id,
        "Successfully deleted registration"
    );

    Ok(Json(result.response))
}

/// Handler for GET `/registrations/monthly` endpoint.
async fn handle_monthly_summary(
    AxumState(app_state): AxumState<AppState>,
    RequestIdentity { actor, .. }: RequestIdentity,
    Query(query): Query<MonthlySummaryRequest>,
) -> Result<Json<MonthlySummaryResponse>, HttpError> {
    info!(
        employee_id = %actor.employee_id,
        year = query.year,
        month = query.month,
        "Handling monthly_summary request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: MonthlySummaryResponse = get_monthly_summary(&mut persistence, &query, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/availability` endpoint.
///
/// Returns remaining capacity for every slot of a week.
async fn handle_availability(
    AxumState(app_state): AxumState<AppState>,
    RequestIdentity { actor, .. }: RequestIdentity,
    Query(query): Query<AvailabilityRequest>,
) -> Result<Json<AvailabilityResponse>, HttpError> {
    info!(
        employee_id = %actor.employee_id,
        week_start = %query.week_start,
        "Handling availability request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: AvailabilityResponse = get_week_availability(
        &mut persistence,
        &query,
        &actor,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/force_assign` endpoint.
async fn handle_force_assign(
    AxumState(app_state): AxumState<AppState>,
    RequestIdentity { actor, cause }: RequestIdentity,
    Json(req): Json<ForceShiftRequest>,
) -> Result<Json<ForceAssignResponse>, HttpError> {
    info!(
        manager_id = %actor.employee_id,
        employee_id = %req.employee_id,
        date = %req.date,
        shift_id = %req.shift_id,
        "Handling force_assign request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let result: ApiResult<ForceAssignResponse> = force_assign(
        &mut persistence,
        &req,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    info!(
        event_id = result.response.event_id,
        employee_id = %req.employee_id,
        "Successfully force-assigned shift"
    );

    Ok(Json(result.response))
}

/// Handler for POST `/force_unassign` endpoint.
async fn handle_force_unassign(
    AxumState(app_state): AxumState<AppState>,
    RequestIdentity { actor, cause }: RequestIdentity,
    Json(req): Json<ForceShiftRequest>,
) -> Result<Json<ForceUnassignResponse>, HttpError> {
    info!(
        manager_id = %actor.employee_id,
        employee_id = %req.employee_id,
        date = %req.date,
        shift_id = %req.shift_id,
        "Handling force_unassign request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let result: ApiResult<ForceUnassignResponse> = force_unassign(
        &mut persistence,
        &req,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    info!(
        event_id = result.response.event_id,
        employee_id = %req.employee_id,
        removed_from = ?result.response.removed_from_counters,
        drafts_updated = result.response.drafts_updated,
        "Successfully force-unassigned shift"
    );

    Ok(Json(result.response))
}

/// Handler for POST `/schedule/publish` endpoint.
///
/// Publishes a complete counter assignment map for one slot.
async fn handle_publish_schedule(
    AxumState(app_state): AxumState<AppState>,
    RequestIdentity { actor, cause }: RequestIdentity,
    Json(req): Json<PublishScheduleRequest>,
) -> Result<Json<PublishScheduleResponse>, HttpError> {
    info!(
        manager_id = %actor.employee_id,
        date = %req.date,
        shift_id = %req.shift_id,
        expected_version = ?req.expected_version,
        "Handling publish_schedule request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let result: ApiResult<PublishScheduleResponse> = publish_schedule(
        &mut persistence,
        &req,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    info!(
        event_id = result.response.event_id,
        version = result.response.slot.version,
        "Successfully published schedule"
    );

    Ok(Json(result.response))
}

/// Handler for GET `/schedule` endpoint.
async fn handle_get_schedule(
    AxumState(app_state): AxumState<AppState>,
    RequestIdentity { actor, .. }: RequestIdentity,
    Query(query): Query<SlotRequest>,
) -> Result<Json<ScheduleSlotInfo>, HttpError> {
    info!(
        employee_id = %actor.employee_id,
        date = %query.date,
        shift_id = %query.shift_id,
        "Handling get_schedule request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ScheduleSlotInfo = get_schedule_slot(&mut persistence, &query, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/drafts/open` endpoint.
///
/// Returns the caller session's draft, reusing a dirty one.
async fn handle_open_draft(
    AxumState(app_state): AxumState<AppState>,
    RequestIdentity { actor, .. }: RequestIdentity,
    Json(req): Json<SlotRequest>,
) -> Result<Json<DraftResponse>, HttpError> {
    info!(
        manager_id = %actor.employee_id,
        session_id = ?actor.session_id,
        date = %req.date,
        shift_id = %req.shift_id,
        "Handling open_draft request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: DraftResponse = open_draft(&mut persistence, &req, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/drafts/edit` endpoint.
async fn handle_edit_draft(
    AxumState(app_state): AxumState<AppState>,
    RequestIdentity { actor, .. }: RequestIdentity,
    Json(req): Json<EditDraftRequest>,
) -> Result<Json<DraftResponse>, HttpError> {
    info!(
        manager_id = %actor.employee_id,
        session_id = ?actor.session_id,
        date = %req.date,
        shift_id = %req.shift_id,
        edit = ?req.edit,
        "Handling edit_draft request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: DraftResponse = edit_draft(&mut persistence, &req, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/drafts/discard` endpoint.
async fn handle_discard_draft(
    AxumState(app_state): AxumState<AppState>,
    RequestIdentity { actor, .. }: RequestIdentity,
    Json(req): Json<SlotRequest>,
) -> Result<Json<DraftResponse>, HttpError> {
    info!(
        manager_id = %actor.employee_id,
        session_id = ?actor.session_id,
        date = %req.date,
        shift_id = %req.shift_id,
        "Handling discard_draft request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: DraftResponse = discard_draft(&mut persistence, &req, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/drafts/publish` endpoint.
async fn handle_publish_draft(
    AxumState(app_state): AxumState<AppState>,
    RequestIdentity { actor, cause }: RequestIdentity,
    Json(req): Json<SlotRequest>,
) -> Result<Json<PublishDraftResponse>, HttpError> {
    info!(
        manager_id = %actor.employee_id,
        session_id = ?actor.session_id,
        date = %req.date,
        shift_id = %req.shift_id,
        "Handling publish_draft request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let result: Result<ApiResult<PublishDraftResponse>, ApiError> = publish_draft(
        &mut persistence,
        &req,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
    );
    drop(persistence);

    match result {
        Ok(result) => {
            info!(
                event_id = result.response.event_id,
                version = result.response.draft.published_version,
                "Successfully published draft"
            );
            Ok(Json(result.response))
        }
        Err(err) => {
            if matches!(err, ApiError::Conflict { .. }) {
                warn!(error = %err, "Draft is stale; edits kept");
            }
            Err(err.into())
        }
    }
}

/// Handler for GET `/audit` endpoint.
async fn handle_list_audit_events(
    AxumState(app_state): AxumState<AppState>,
    RequestIdentity { actor, .. }: RequestIdentity,
    Query(query): Query<ListAuditEventsRequest>,
) -> Result<Json<ListAuditEventsResponse>, HttpError> {
    info!(
        employee_id = %actor.employee_id,
        after_event_id = ?query.after_event_id,
        limit = ?query.limit,
        "Handling list_audit_events request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ListAuditEventsResponse = list_audit_events(&mut persistence, &query, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Builds the application router.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/registrations/toggle", post(handle_toggle_shift))
        .route("/registrations", post(handle_submit_registration))
        .route("/registrations", get(handle_list_registrations))
        .route(
            "/registrations/{registration_id}",
            delete(handle_delete_registration),
        )
        .route("/registrations/monthly", get(handle_monthly_summary))
        .route("/availability", get(handle_availability))
        .route("/force_assign", post(handle_force_assign))
        .route("/force_unassign", post(handle_force_unassign))
        .route("/schedule/publish", post(handle_publish_schedule))
        .route("/schedule", get(handle_get_schedule))
        .route("/drafts/open", post(handle_open_draft))
        .route("/drafts/edit", post(handle_edit_draft))
        .route("/drafts/discard", post(handle_discard_draft))
        .route("/drafts/publish", post(handle_publish_draft))
        .route("/audit", get(handle_list_audit_events))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Shiftboard Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    if let Some(fixtures_path) = &args.fixtures {
        info!("Loading fixtures from: {}", fixtures_path);
        Fixtures::from_file(fixtures_path)?.apply(&mut persistence)?;
    }

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
