//! Refreshing every configured calendar at once.

use chrono::Utc;
use futures::future::join_all;
use hwr_calendar_core::refresh_calendar;

use crate::state::AppState;

/// Outcome counts of one sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub refreshed: usize,
    pub failed: usize,
}

/// Refresh all calendars concurrently. A failing calendar is logged and
/// does not affect the others.
pub async fn sync_all(state: &AppState) -> SyncReport {
    let now = Utc::now();

    let results = join_all(state.catalog.sources().iter().map(|source| async move {
        let result =
            refresh_calendar(state.fetcher.as_ref(), state.store.as_ref(), source, now).await;
        if let Err(e) = &result {
            tracing::warn!(url = %source.url, error = %e, "Failed to sync calendar");
        }
        result.is_ok()
    }))
    .await;

    let refreshed = results.iter().filter(|ok| **ok).count();
    let report = SyncReport {
        refreshed,
        failed: results.len() - refreshed,
    };

    tracing::info!(
        refreshed = report.refreshed,
        failed = report.failed,
        "Calendar sync finished"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingFeed, state_with};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_sync_all_refreshes_every_source() {
        let (state, store) = state_with(None);

        let report = sync_all(&state).await;

        assert_eq!(report.refreshed, state.catalog.sources().len());
        assert_eq!(report.failed, 0);
        assert_eq!(store.keys().await.len(), state.catalog.sources().len());
    }

    #[tokio::test]
    async fn test_failures_are_counted_not_propagated() {
        let (mut state, store) = state_with(None);
        state.fetcher = Arc::new(FailingFeed);

        let report = sync_all(&state).await;

        assert_eq!(report.refreshed, 0);
        assert_eq!(report.failed, state.catalog.sources().len());
        assert!(store.keys().await.is_empty());
    }
}
