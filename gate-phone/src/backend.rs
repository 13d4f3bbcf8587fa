//! Phone abstraction trait.
//!
//! Lets the request handler and heartbeat task run against the real HTTP
//! phone or an in-memory stand-in without changing their logic.

use async_trait::async_trait;
use gate_core::GateId;

use crate::PhoneError;

/// What the phone said in reply to a gate-open call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneCallResult {
    /// `true` if the phone answered with a 2xx status.
    pub succeeded: bool,
    /// Status code returned by the phone.
    pub http_status: Option<u16>,
    /// Response body, if it could be read.
    pub body_text: Option<String>,
    /// Round-trip time in milliseconds.
    pub rtt_ms: Option<u64>,
}

/// Outcome of one liveness ping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Heartbeat {
    /// `true` if the phone answered with a 2xx status.
    pub reachable: bool,
    /// Round-trip time in milliseconds, `None` if the phone did not answer.
    pub rtt_ms: Option<u64>,
}

/// A remote device able to open gates.
///
/// Implementations must be `Send + Sync` to be shared between request
/// handlers and the heartbeat task.
///
/// # Cancel Safety
/// Both methods are cancel safe. Dropping the future tears down any
/// in-flight connection.
#[async_trait]
pub trait PhoneApi: Send + Sync {
    /// Ask the phone to actuate `gate`.
    ///
    /// # Errors
    /// Returns [`PhoneError::Timeout`] if the phone does not answer in time,
    /// [`PhoneError::NoResponse`] if it hangs up without answering and
    /// [`PhoneError::Transport`] if it cannot be reached at all.
    async fn open_gate(&self, gate: GateId) -> Result<PhoneCallResult, PhoneError>;

    /// Ping the phone. Never fails; an unreachable phone yields
    /// `reachable: false` with no RTT.
    async fn heartbeat(&self) -> Heartbeat;
}
