//! Error types for the bridge crate.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gate_phone::PhoneError;
use serde_json::json;

/// Rejections and relay failures of a gate-open request.
///
/// The `Display` text of each variant is the `error` field of the JSON body.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// `X-API-Key` missing or wrong.
    #[error("Unauthorized")]
    Unauthorized,

    /// Path segment is not one of the known gates.
    #[error("Unknown gate_id")]
    UnknownGate,

    /// The gate was triggered less than the minimum interval ago.
    #[error("Too Many Requests for this gate")]
    RateLimited,

    /// The phone produced no response at all.
    #[error("Phone returned nothing")]
    PhoneSilent,

    /// The phone answered with a non-success status.
    #[error("Phone returned {status}")]
    PhoneRejected { status: u16, body: Option<String> },

    /// Timeout or transport failure while relaying.
    #[error("Phone bridge error: {0}")]
    Bridge(String),
}

impl From<PhoneError> for ApiError {
    fn from(err: PhoneError) -> Self {
        match err {
            PhoneError::NoResponse => ApiError::PhoneSilent,
            other => ApiError::Bridge(other.to_string()),
        }
    }
}

impl ApiError {
    /// HTTP status this error is reported with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::UnknownGate => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::PhoneSilent | ApiError::PhoneRejected { .. } | ApiError::Bridge(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::PhoneRejected { body, .. } => json!({"error": self.to_string(), "body": body}),
            _ => json!({"error": self.to_string()}),
        };
        (status, Json(body)).into_response()
    }
}
