//! HTTP API exposed to callers.
//!
//! - GET /            - static welcome page
//! - GET /health      - health check
//! - GET /rttStart/:channel  - start a transcription task
//! - GET /rttQuery/:task_id  - query task status
//! - GET /rttStop/:task_id   - stop a task
//!
//! No caller authentication; task ids returned by start must be retained
//! by the caller and passed back on query/stop.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
