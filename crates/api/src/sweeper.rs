//! Background expiry sweep.
//!
//! One tick per second for the lifetime of the process: every pending entry
//! ages by one, entries reaching the expiry threshold are dropped, and the
//! mirror file is rewritten. The loop has no shutdown path of its own; it
//! dies with the process.

use std::sync::Arc;
use std::time::Duration;

use crate::stores::CodeStore;

/// Interval between sweep ticks.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(1);

pub async fn run(store: Arc<dyn CodeStore>) {
    let mut interval = tokio::time::interval(SWEEP_INTERVAL);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // The first tick completes immediately; consume it so the first sweep
    // lands a full interval after startup.
    interval.tick().await;

    loop {
        interval.tick().await;

        if let Err(err) = store.sweep().await {
            tracing::error!("sweep failed: {err:?}");
        }
    }
}
