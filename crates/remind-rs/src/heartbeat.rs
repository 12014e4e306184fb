//! Periodic liveness tick.
//!
//! The heartbeat only logs the current time and how many reminders are
//! stored. It never fires, edits, or removes reminders: time and date fields
//! are display-only.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::store::ReminderStore;

/// Spawn the heartbeat on the current Tokio runtime.
///
/// Returns `None` (and spawns nothing) when `interval` is zero. The task runs
/// until aborted or the runtime shuts down.
pub fn spawn_heartbeat(store: Arc<ReminderStore>, interval: Duration) -> Option<JoinHandle<()>> {
    if interval.is_zero() {
        debug!("Heartbeat disabled");
        return None;
    }
    info!("Heartbeat every {:.0}s", interval.as_secs_f64());

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; skip it so the first log
        // line lands one interval after startup.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            info!(
                "Checking reminders at {} ({} stored)",
                Local::now().format("%H:%M:%S"),
                store.len()
            );
        }
    }))
}
