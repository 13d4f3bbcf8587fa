//! [`PhoneApi`] implementation speaking HTTP to the real device.

use async_trait::async_trait;
use gate_core::GateId;
use hyper::Method;
use serde::{Deserialize, Serialize};

use crate::backend::{Heartbeat, PhoneApi, PhoneCallResult};
use crate::config::PING_PATH;
use crate::tcp_client::{duration_ms, request_with_timeout};
use crate::{PhoneConfig, PhoneError};

/// JSON body of a gate-open request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenGateBody {
    pub token: String,
    pub x: u32,
    pub y: u32,
}

impl OpenGateBody {
    /// Body instructing the phone to tap `gate`'s coordinate.
    #[must_use]
    pub fn for_gate(token: &str, gate: GateId) -> Self {
        let point = gate.coordinate();
        Self { token: token.to_owned(), x: point.x, y: point.y }
    }
}

/// The phone reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPhone {
    config: PhoneConfig,
}

impl HttpPhone {
    /// Create a client for the phone described by `config`.
    #[must_use]
    pub fn new(config: PhoneConfig) -> Self {
        Self { config }
    }

    /// The configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &PhoneConfig {
        &self.config
    }
}

#[async_trait]
impl PhoneApi for HttpPhone {
    async fn open_gate(&self, gate: GateId) -> Result<PhoneCallResult, PhoneError> {
        let body = serde_json::to_string(&OpenGateBody::for_gate(&self.config.token, gate))
            .map_err(|e| PhoneError::InvalidRequest(format!("encode open body: {e}")))?;

        let response = request_with_timeout(
            &self.config.authority(),
            Method::POST,
            &self.config.open_path(),
            Some(body),
            self.config.open_timeout,
        )
        .await?;

        let rtt_ms = duration_ms(response.rtt);
        tracing::debug!(gate_id = %gate, status = %response.status, rtt_ms, "phone answered open");

        Ok(PhoneCallResult {
            succeeded: response.status.is_success(),
            http_status: Some(response.status.as_u16()),
            body_text: response.body,
            rtt_ms: Some(rtt_ms),
        })
    }

    async fn heartbeat(&self) -> Heartbeat {
        let result = request_with_timeout(
            &self.config.authority(),
            Method::GET,
            PING_PATH,
            None,
            self.config.heartbeat_timeout,
        )
        .await;

        match result {
            Ok(response) => Heartbeat {
                reachable: response.status.is_success(),
                rtt_ms: Some(duration_ms(response.rtt)),
            },
            Err(e) => {
                tracing::warn!(phone = %self.config.authority(), error = %e, "heartbeat request failed");
                Heartbeat { reachable: false, rtt_ms: None }
            }
        }
    }
}
