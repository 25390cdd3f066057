//! Heartbeat-based presence eviction.
//!
//! Runs every 15 seconds, removes participants whose last heartbeat is more
//! than 10 seconds old and appends a leave notice for each. A failed sweep
//! logs and skips that cycle; the loop never exits.

use std::time::Duration;

use crate::model::now_millis;
use crate::store::ChatStore;

const SWEEP_INTERVAL_SECS: u64 = 15;
const INACTIVE_AFTER_MILLIS: i64 = 10_000;

pub async fn run_sweep_loop(store: ChatStore) {
    tracing::info!(
        interval_secs = SWEEP_INTERVAL_SECS,
        inactive_after_millis = INACTIVE_AFTER_MILLIS,
        "presence sweep loop started"
    );

    loop {
        tokio::time::sleep(Duration::from_secs(SWEEP_INTERVAL_SECS)).await;

        let sweep_store = store.clone();
        let result = tokio::task::spawn_blocking(move || {
            let cutoff = now_millis() - INACTIVE_AFTER_MILLIS;
            sweep_store.evict_inactive(cutoff)
        })
        .await;

        match result {
            Ok(Ok(evicted)) => {
                if !evicted.is_empty() {
                    tracing::info!(evicted = evicted.len(), "inactive participants removed");
                }
            }
            Ok(Err(e)) => tracing::warn!(error = %e, "presence sweep failed"),
            Err(e) => tracing::warn!(error = %e, "presence sweep task panicked"),
        }
    }
}
