//! Error types for the phone client crate.

use std::time::Duration;

/// Reasons a call to the phone produced no usable response.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PhoneError {
    /// No response arrived before the deadline; the call was aborted.
    #[error("Phone timeout")]
    Timeout { after: Duration },

    /// DNS, connect, handshake or mid-request I/O failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The phone accepted the connection but closed it without answering.
    #[error("phone closed the connection without a response")]
    NoResponse,

    /// The request could not be built from the configured target.
    #[error("invalid phone request: {0}")]
    InvalidRequest(String),
}

impl PhoneError {
    /// `true` for [`PhoneError::Timeout`].
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, PhoneError::Timeout { .. })
    }
}
