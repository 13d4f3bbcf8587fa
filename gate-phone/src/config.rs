//! Phone connection settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default bound on a gate-open call.
pub const DEFAULT_OPEN_TIMEOUT: Duration = Duration::from_millis(5000);

/// Default bound on a heartbeat ping.
pub const DEFAULT_HEARTBEAT_TIMEOUT: Duration = Duration::from_millis(3000);

/// Path the phone answers liveness pings on.
pub const PING_PATH: &str = "/ping";

/// Where the phone lives and how to talk to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub struct PhoneConfig {
    /// Host name or IP address of the phone.
    pub host: String,

    /// TCP port of the phone's HTTP server.
    pub port: u16,

    /// Secret first path segment of the open endpoint.
    pub path_salt: String,

    /// Shared token the phone checks before actuating.
    pub token: String,

    /// Deadline for a gate-open call.
    pub open_timeout: Duration,

    /// Deadline for a heartbeat ping.
    pub heartbeat_timeout: Duration,
}

impl PhoneConfig {
    /// Create a config with default timeouts.
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        port: u16,
        path_salt: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            path_salt: path_salt.into(),
            token: token.into(),
            open_timeout: DEFAULT_OPEN_TIMEOUT,
            heartbeat_timeout: DEFAULT_HEARTBEAT_TIMEOUT,
        }
    }

    /// Override both timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, open_timeout: Duration, heartbeat_timeout: Duration) -> Self {
        self.open_timeout = open_timeout;
        self.heartbeat_timeout = heartbeat_timeout;
        self
    }

    /// `host:port`, used both to connect and as the `Host` header.
    #[must_use]
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Request path of the open endpoint, e.g. `/s3cr3t/open`.
    #[must_use]
    pub fn open_path(&self) -> String {
        format!("/{}/open", self.path_salt.trim_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_path_embeds_salt() {
        let config = PhoneConfig::new("10.0.0.7", 8765, "abc123", "tok");
        assert_eq!(config.open_path(), "/abc123/open");
        assert_eq!(config.authority(), "10.0.0.7:8765");
    }

    #[test]
    fn open_path_tolerates_slashes_in_salt() {
        let config = PhoneConfig::new("phone", 1, "/abc123/", "tok");
        assert_eq!(config.open_path(), "/abc123/open");
    }

    #[test]
    fn new_uses_default_timeouts() {
        let config = PhoneConfig::new("phone", 1, "s", "t");
        assert_eq!(config.open_timeout, DEFAULT_OPEN_TIMEOUT);
        assert_eq!(config.heartbeat_timeout, DEFAULT_HEARTBEAT_TIMEOUT);
        assert!(DEFAULT_HEARTBEAT_TIMEOUT < DEFAULT_OPEN_TIMEOUT);
    }
}
