//! Shared application state handed to every request handler.

use std::{sync::Arc, time::Duration};

use gate_core::{HealthTracker, RateLimiter};
use gate_phone::PhoneApi;

/// Process-wide state: the phone client plus the two pieces of shared
/// mutable state, the per-gate rate limiter and the phone health record.
#[derive(Clone)]
pub struct AppState {
    pub api_key: Arc<str>,
    pub phone: Arc<dyn PhoneApi>,
    pub limiter: Arc<RateLimiter>,
    pub health: Arc<HealthTracker>,
}

impl AppState {
    /// Build fresh state: no gate triggered yet, phone not yet seen.
    #[must_use]
    pub fn new(api_key: &str, phone: Arc<dyn PhoneApi>, min_interval: Duration) -> Self {
        Self {
            api_key: Arc::from(api_key),
            phone,
            limiter: Arc::new(RateLimiter::new(min_interval)),
            health: Arc::new(HealthTracker::new()),
        }
    }

    /// Exact comparison of a presented key against the configured one.
    #[must_use]
    pub fn is_authorized(&self, presented: Option<&str>) -> bool {
        presented == Some(&*self.api_key)
    }
}
