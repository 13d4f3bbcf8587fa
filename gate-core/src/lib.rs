//! Core types for the GateBridge phone relay.
//!
//! Defines the fixed gate table, the per-gate rate limiter and the shared
//! phone health record.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod gate;
pub mod health;
pub mod rate_limit;

pub use error::CoreError;
pub use gate::{Coordinate, GateId};
pub use health::{HealthTracker, PhoneHealth};
pub use rate_limit::RateLimiter;
