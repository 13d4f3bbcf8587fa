//! Axum route handlers for the bridge API.

use std::any::Any;
use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use gate_core::{GateId, PhoneHealth};
use serde::Serialize;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{error::ApiError, state::AppState};

/// Header carrying the shared API key.
pub const API_KEY_HEADER: &str = "x-api-key";

// ── Response types ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub phone: PhoneHealth,
}

#[derive(Debug, Serialize)]
pub struct OpenedResponse {
    pub status: &'static str,
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Build the application router over the given state.
///
/// A panic inside a handler is answered with a 502 bridge error instead of
/// dropping the connection.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/gates/{gate_id}/open", post(open_gate))
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[allow(clippy::needless_pass_by_value)]
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let reason = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else {
        "handler panicked".to_owned()
    };
    tracing::error!(error = %reason, "request handler panicked");
    ApiError::Bridge(reason).into_response()
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// `GET /health`: bridge liveness plus the last heartbeat result.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse { status: "ok", phone: state.health.snapshot() }),
    )
}

/// `POST /api/gates/{gate_id}/open`: ask the phone to open a gate.
///
/// The rate-limit slot is claimed before the phone is called and is not
/// given back if the call fails.
///
/// # Errors
/// Returns [`ApiError::Unauthorized`] on a missing or wrong `X-API-Key`,
/// [`ApiError::UnknownGate`] if the id is not a known gate,
/// [`ApiError::RateLimited`] inside the cooldown window, and
/// [`ApiError::PhoneSilent`], [`ApiError::PhoneRejected`] or
/// [`ApiError::Bridge`] when the relay fails.
pub async fn open_gate(
    State(state): State<AppState>,
    Path(raw_gate_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<OpenedResponse>, ApiError> {
    tracing::info!(gate_id = %raw_gate_id, "open gate requested");

    let presented = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
    if !state.is_authorized(presented) {
        tracing::info!(gate_id = %raw_gate_id, "rejected: unauthorized");
        return Err(ApiError::Unauthorized);
    }

    let Ok(gate) = raw_gate_id.parse::<GateId>() else {
        tracing::info!(gate_id = %raw_gate_id, "rejected: unknown gate");
        return Err(ApiError::UnknownGate);
    };

    if !state.limiter.try_acquire(gate, Instant::now()) {
        tracing::info!(gate_id = %gate, "rejected: too many requests for this gate");
        return Err(ApiError::RateLimited);
    }

    let result = match state.phone.open_gate(gate).await {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(gate_id = %gate, timeout = e.is_timeout(), error = %e, "phone relay failed");
            return Err(e.into());
        }
    };

    if !result.succeeded {
        let Some(status) = result.http_status else {
            tracing::warn!(gate_id = %gate, "phone returned nothing");
            return Err(ApiError::PhoneSilent);
        };
        tracing::warn!(gate_id = %gate, status, rtt_ms = ?result.rtt_ms, "phone rejected open");
        return Err(ApiError::PhoneRejected { status, body: result.body_text });
    }

    tracing::info!(gate_id = %gate, rtt_ms = ?result.rtt_ms, "gate opened");
    Ok(Json(OpenedResponse { status: "ok" }))
}
