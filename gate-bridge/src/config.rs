//! Environment-driven configuration.

use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use gate_phone::PhoneConfig;

const DEFAULT_PHONE_PORT: u16 = 8765;
const DEFAULT_PHONE_TIMEOUT_MS: u64 = 5000;
const DEFAULT_HEARTBEAT_TIMEOUT_MS: u64 = 3000;
const DEFAULT_MIN_INTERVAL_SEC: u64 = 5;
const DEFAULT_HEARTBEAT_MS: u64 = 10_000;
const DEFAULT_APP_PORT: u16 = 3000;

/// Errors raised while loading [`BridgeConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("missing required setting {var}")]
    Missing { var: &'static str },

    /// A variable is set but cannot be used.
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    /// Heartbeats could pile up because a ping may outlive its period.
    #[error("HEARTBEAT_TIMEOUT_MS ({timeout_ms}) must be shorter than HEARTBEAT_MS ({period_ms})")]
    HeartbeatTooSlow { timeout_ms: u64, period_ms: u64 },
}

/// Everything the bridge needs at startup.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct BridgeConfig {
    /// Shared secret expected in `X-API-Key`.
    pub api_key: String,

    /// How to reach the phone.
    pub phone: PhoneConfig,

    /// Cooldown between two triggers of the same gate.
    pub min_interval: Duration,

    /// Period of the heartbeat task.
    pub heartbeat_period: Duration,

    /// Port the HTTP API listens on.
    pub app_port: u16,
}

impl BridgeConfig {
    /// Load from the process environment.
    ///
    /// # Errors
    /// See [`BridgeConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load using `lookup` to resolve variable names.
    ///
    /// # Errors
    /// Returns [`ConfigError::Missing`] for an unset required variable,
    /// [`ConfigError::Invalid`] for unparsable or zero values and
    /// [`ConfigError::HeartbeatTooSlow`] if the heartbeat timeout is not
    /// shorter than the heartbeat period.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing { var })
        };

        let api_key = required("API_KEY")?;
        let phone_host = required("PHONE_HOST")?;
        let path_salt = required("PHONE_PATH_SALT")?;
        let token = required("PHONE_TOKEN")?;

        let phone_port = parse_or(&lookup, "PHONE_PORT", DEFAULT_PHONE_PORT)?;
        let app_port = parse_or(&lookup, "APP_PORT", DEFAULT_APP_PORT)?;
        let open_timeout_ms = non_zero(&lookup, "PHONE_TIMEOUT_MS", DEFAULT_PHONE_TIMEOUT_MS)?;
        let heartbeat_timeout_ms =
            non_zero(&lookup, "HEARTBEAT_TIMEOUT_MS", DEFAULT_HEARTBEAT_TIMEOUT_MS)?;
        let heartbeat_ms = non_zero(&lookup, "HEARTBEAT_MS", DEFAULT_HEARTBEAT_MS)?;
        let min_interval_sec = parse_or(&lookup, "MIN_INTERVAL_SEC", DEFAULT_MIN_INTERVAL_SEC)?;

        if heartbeat_timeout_ms >= heartbeat_ms {
            return Err(ConfigError::HeartbeatTooSlow {
                timeout_ms: heartbeat_timeout_ms,
                period_ms: heartbeat_ms,
            });
        }

        let phone = PhoneConfig::new(phone_host, phone_port, path_salt, token).with_timeouts(
            Duration::from_millis(open_timeout_ms),
            Duration::from_millis(heartbeat_timeout_ms),
        );

        Ok(Self {
            api_key,
            phone,
            min_interval: Duration::from_secs(min_interval_sec),
            heartbeat_period: Duration::from_millis(heartbeat_ms),
            app_port,
        })
    }

    /// `0.0.0.0:{app_port}`.
    #[must_use]
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.app_port))
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::Invalid { var, reason: e.to_string() }),
        _ => Ok(default),
    }
}

fn non_zero<F>(lookup: &F, var: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_or(lookup, var, default)?;
    if value == 0 {
        return Err(ConfigError::Invalid { var, reason: "must be greater than zero".to_owned() });
    }
    Ok(value)
}
