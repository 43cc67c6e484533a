//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    error::ReminderError,
    reminder::PRESET_MINUTES,
    state::AppState,
    tasks::{ControlError, Outcome},
};
use super::responses::{ApiResponse, HealthResponse, ResolveRequest, StartRequest, StatusResponse};

type ApiResult = Result<Json<ApiResponse>, (StatusCode, Json<ApiResponse>)>;

/// Handle POST /start - Start a reminder cycle
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    request: Result<Json<StartRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = request.map_err(|rejection| reject(&state, "start", rejection))?;
    let result = state.reminders.start(request.minutes).await;
    info!("Start endpoint called with {} minutes", request.minutes);
    respond(&state, "start", result)
}

/// Handle POST /stop - Stop the timer and dismiss any pending reminder
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    let result = state.reminders.stop().await;
    info!("Stop endpoint called");
    respond(&state, "stop", result)
}

/// Handle POST /resolve - Answer the fired reminder
pub async fn resolve_handler(
    State(state): State<Arc<AppState>>,
    request: Result<Json<ResolveRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = request.map_err(|rejection| reject(&state, "resolve", rejection))?;
    let result = state.reminders.resolve(request.choice).await;
    info!("Resolve endpoint called with {:?}", request.choice);
    respond(&state, "resolve", result)
}

/// Handle GET /status - Return current reminder status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let snapshot = state.snapshot();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer_remaining_seconds: snapshot.timer.remaining_seconds(chrono::Utc::now()),
        awaiting_resolution: snapshot.pending.is_some(),
        timer: snapshot.timer,
        pending: snapshot.pending,
        last_fired: snapshot.last_fired,
        presets: PRESET_MINUTES.to_vec(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

fn respond(state: &AppState, action: &str, result: Result<Outcome, ControlError>) -> ApiResult {
    let timer = state.snapshot().timer;
    match result {
        Ok(outcome) => {
            state.record_action(action);
            Ok(Json(ApiResponse::action(outcome.action, outcome.notice, timer)))
        }
        Err(e) => {
            let status = error_status(&e);
            if status == StatusCode::SERVICE_UNAVAILABLE {
                error!("{} failed: {}", action, e);
            } else {
                warn!("{} rejected: {}", action, e);
            }
            Err((status, Json(ApiResponse::error(e.to_string(), timer))))
        }
    }
}

/// Malformed request bodies get the same JSON error shape as contract errors
fn reject(state: &AppState, action: &str, rejection: JsonRejection) -> (StatusCode, Json<ApiResponse>) {
    let message = rejection.body_text();
    warn!("{} rejected malformed body: {}", action, message);
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::error(message, state.snapshot().timer)),
    )
}

fn error_status(error: &ControlError) -> StatusCode {
    match error {
        ControlError::Reminder(ReminderError::InvalidInterval { .. }) => StatusCode::BAD_REQUEST,
        ControlError::Reminder(ReminderError::NoPendingResolution)
        | ControlError::Reminder(ReminderError::ResolutionPending) => StatusCode::CONFLICT,
        ControlError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
}
