use axum::http::StatusCode;
use thiserror::Error;

/// Failures on the path between an inbound request and the vendor RTT API.
///
/// Each variant maps to a distinct HTTP status so callers can tell a dead
/// network from a vendor rejection without reading server logs.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never produced a usable response (connect failure,
    /// timeout, protocol error).
    #[error("vendor transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The vendor answered with a non-2xx status.
    #[error("vendor rejected request with {status}: {body}")]
    VendorRejected {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The vendor answered 2xx but the body was missing an expected field
    /// or failed to decode.
    #[error("malformed vendor response: {0}")]
    MalformedResponse(String),

    /// Task creation succeeded at the HTTP level but the vendor reported a
    /// status other than STARTED / IN_PROGRESS.
    #[error("vendor reported task status {status}")]
    TaskRejected { status: String },
}

impl GatewayError {
    /// HTTP status returned to the gateway's own caller.
    pub fn http_status(&self) -> StatusCode {
        match self {
            GatewayError::Transport(_) => StatusCode::BAD_GATEWAY,
            GatewayError::VendorRejected { status, .. } => {
                if *status == reqwest::StatusCode::NOT_FOUND {
                    StatusCode::NOT_FOUND
                } else {
                    StatusCode::BAD_GATEWAY
                }
            }
            GatewayError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
            GatewayError::TaskRejected { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
