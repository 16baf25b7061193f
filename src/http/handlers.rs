use super::state::AppState;
use crate::error::GatewayError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
};
use serde::Serialize;
use tracing::info;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub id: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub result: String,
}

#[derive(Debug, Serialize)]
pub struct StopResponse {
    pub result: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(err: GatewayError) -> axum::response::Response {
    (
        err.http_status(),
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /
pub async fn welcome() -> Html<&'static str> {
    Html("<html><h2>Welcome to the RTT gateway.</h2></html>")
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET /rttStart/:channel
/// Start a transcription task for the channel.
pub async fn rtt_start(
    State(state): State<AppState>,
    Path(channel): Path<String>,
) -> impl IntoResponse {
    info!("Starting RTT task for channel: {}", channel);

    match state.orchestrator.start_task(&channel).await {
        Ok(handle) => (
            StatusCode::OK,
            Json(StartResponse {
                id: handle.task_id,
                status: handle.status,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /rttQuery/:task_id
/// Query the vendor status of a task.
pub async fn rtt_query(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> impl IntoResponse {
    match state.orchestrator.query_task(&task_id).await {
        Ok(status) => (StatusCode::OK, Json(QueryResponse { result: status })).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /rttStop/:task_id
/// Stop a running task.
pub async fn rtt_stop(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> impl IntoResponse {
    info!("Stopping RTT task: {}", task_id);

    match state.orchestrator.stop_task(&task_id).await {
        Ok(()) => (StatusCode::OK, Json(StopResponse { result: true })).into_response(),
        Err(e) => error_response(e),
    }
}
