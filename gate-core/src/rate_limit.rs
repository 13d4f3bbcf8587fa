//! Per-gate cooldown tracking.
//!
//! Each gate remembers the instant of its last accepted trigger. A new
//! trigger is accepted only once the configured minimum interval has passed.

use std::{
    collections::HashMap,
    sync::Mutex,
    time::{Duration, Instant},
};

use crate::gate::GateId;

/// Thread-safe per-gate rate limiter.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_trigger: Mutex<HashMap<GateId, Instant>>,
}

impl RateLimiter {
    /// Create a limiter enforcing `min_interval` between triggers of one gate.
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self { min_interval, last_trigger: Mutex::new(HashMap::new()) }
    }

    /// Minimum spacing between two accepted triggers of the same gate.
    #[must_use]
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Check the cooldown for `gate` and, if it has elapsed, claim the slot.
    ///
    /// Check and commit happen under a single lock acquisition, so two
    /// concurrent callers for the same gate can never both get `true`.
    /// A rejected attempt leaves the stored timestamp untouched.
    ///
    /// # Panics
    /// Panics if the internal `Mutex` is poisoned.
    pub fn try_acquire(&self, gate: GateId, now: Instant) -> bool {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let mut last = self.last_trigger.lock().expect("rate limiter lock poisoned");

        if let Some(prev) = last.get(&gate) {
            if now.saturating_duration_since(*prev) < self.min_interval {
                return false;
            }
        }
        last.insert(gate, now);
        true
    }

    /// Instant of the last accepted trigger for `gate`, if any.
    ///
    /// # Panics
    /// Panics if the internal `Mutex` is poisoned.
    #[must_use]
    pub fn last_trigger(&self, gate: GateId) -> Option<Instant> {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let last = self.last_trigger.lock().expect("rate limiter lock poisoned");
        last.get(&gate).copied()
    }
}
