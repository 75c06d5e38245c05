//! In-process periodic sync, for deployments without an external cron.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time;

use crate::state::AppState;
use crate::sync::sync_all;

/// Run `sync_all` every `interval`, starting immediately.
pub fn spawn(state: AppState, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        tracing::info!("Sync scheduler started (interval: {:?})", interval);

        loop {
            ticker.tick().await;
            tracing::debug!("Running scheduled sync");
            sync_all(&state).await;
        }
    })
}
