use super::handlers;
use super::state::AppState;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::welcome))
        .route("/health", get(handlers::health_check))
        // Task lifecycle
        .route("/rttStart/:channel", get(handlers::rtt_start))
        .route("/rttQuery/:task_id", get(handlers::rtt_query))
        .route("/rttStop/:task_id", get(handlers::rtt_stop))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
