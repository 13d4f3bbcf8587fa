//! Last known liveness of the phone, written by the heartbeat task.

use std::sync::RwLock;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Snapshot of the phone's liveness as seen by the most recent heartbeat.
///
/// Serialized with the field names the `/health` endpoint exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhoneHealth {
    /// Whether the last heartbeat got a successful answer.
    #[serde(rename = "ok")]
    pub reachable: bool,
    /// Round-trip time of the last answered heartbeat.
    #[serde(rename = "rttMs")]
    pub last_rtt_ms: Option<u64>,
    /// Epoch milliseconds of the last time the phone answered, `0` if never.
    #[serde(rename = "seenAt")]
    pub last_seen_at_ms: i64,
}

/// Shared, thread-safe holder of the current [`PhoneHealth`].
#[derive(Debug, Default)]
pub struct HealthTracker {
    state: RwLock<PhoneHealth>,
}

impl HealthTracker {
    /// Create a tracker in the initial state: unreachable, never seen.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a heartbeat outcome using the current wall clock.
    ///
    /// See [`HealthTracker::update_at`].
    pub fn update(&self, reachable: bool, rtt_ms: Option<u64>) {
        self.update_at(reachable, rtt_ms, Utc::now().timestamp_millis());
    }

    /// Record a heartbeat outcome observed at `now_ms` (epoch milliseconds).
    ///
    /// `rtt_ms` is `Some` only when the phone actually answered; in that case
    /// `last_seen_at_ms` advances. A failed heartbeat clears the RTT and
    /// leaves `last_seen_at_ms` where it was.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    pub fn update_at(&self, reachable: bool, rtt_ms: Option<u64>, now_ms: i64) {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let mut state = self.state.write().expect("health lock poisoned");
        state.reachable = reachable;
        state.last_rtt_ms = rtt_ms;
        if rtt_ms.is_some() {
            state.last_seen_at_ms = state.last_seen_at_ms.max(now_ms);
        }
    }

    /// Consistent copy of the current record.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn snapshot(&self) -> PhoneHealth {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let state = self.state.read().expect("health lock poisoned");
        *state
    }
}
