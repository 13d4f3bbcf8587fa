//! Background liveness probing of the phone.

use std::{sync::Arc, time::Duration};

use gate_core::HealthTracker;
use gate_phone::{Heartbeat, PhoneApi};
use tokio::{task::JoinHandle, time::MissedTickBehavior};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Ping the phone once and record the outcome.
pub async fn beat_once(phone: &dyn PhoneApi, health: &HealthTracker) -> Heartbeat {
    let beat = phone.heartbeat().await;
    health.update(beat.reachable, beat.rtt_ms);
    tracing::debug!(reachable = beat.reachable, rtt_ms = ?beat.rtt_ms, "heartbeat recorded");
    beat
}

/// Spawn the heartbeat loop, ticking every `period` starting immediately.
///
/// Ticks run one after another inside a single task, so a slow ping delays
/// the next tick instead of overlapping it. Each ping is bounded by the
/// phone's heartbeat timeout, which config validation keeps below `period`.
/// The task runs until the returned handle is aborted.
pub fn spawn_heartbeat(
    phone: Arc<dyn PhoneApi>,
    health: Arc<HealthTracker>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period.max(MIN_PERIOD));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let beat = beat_once(phone.as_ref(), &health).await;
            if !beat.reachable {
                tracing::warn!(rtt_ms = ?beat.rtt_ms, "phone unreachable");
            }
        }
    })
}
