//! HTTP bridge between API callers and the gate-opening phone.
//!
//! Authorizes and rate-limits gate-open requests, relays them to the phone
//! and keeps a heartbeat-driven view of the phone's liveness.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod error;
pub mod heartbeat;
pub mod routes;
pub mod state;

pub use config::{BridgeConfig, ConfigError};
pub use error::ApiError;
pub use heartbeat::spawn_heartbeat;
pub use routes::create_router;
pub use state::AppState;
