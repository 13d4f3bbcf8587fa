//! Client for the gate-opening phone.
//!
//! Sends gate-open commands and liveness pings over HTTP, each bounded by
//! its own deadline.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod backend;
pub mod config;
pub mod error;
pub mod http_phone;
pub mod tcp_client;

pub use backend::{Heartbeat, PhoneApi, PhoneCallResult};
pub use config::PhoneConfig;
pub use error::PhoneError;
pub use http_phone::{HttpPhone, OpenGateBody};
pub use tcp_client::{request_with_timeout, PhoneResponse};
