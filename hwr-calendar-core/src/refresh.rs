//! Refreshing a calendar: fetch the feed, merge with the cache, persist.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CalendarResult;
use crate::event::Event;
use crate::ics::parse_calendar;
use crate::merge::merge_events;
use crate::sources::CalendarSource;
use crate::store::{self, CalendarStore};

/// Downloads the raw ICS text of a feed
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> CalendarResult<String>;
}

/// Fetch `source`, merge it with its cached calendar and write the result back.
///
/// Returns the merged, unfiltered events. When the merge holds no future
/// events the cache entry is removed instead of written. Nothing is rolled
/// back on failure.
pub async fn refresh_calendar(
    fetcher: &dyn FeedFetcher,
    store: &dyn CalendarStore,
    source: &CalendarSource,
    now: DateTime<Utc>,
) -> CalendarResult<Vec<Event>> {
    let body = fetcher.fetch(&source.url).await?;
    let fetched = parse_calendar(&body)?;

    let cached = store::load_events(store, &source.url).await?;

    let merged = merge_events(cached, fetched, now);

    if merged.has_future() {
        store::save_events(store, &source.url, &merged.events).await?;
    } else {
        tracing::info!(url = %source.url, "No future events left, dropping cached calendar");
        store.delete(&source.url).await?;
    }

    tracing::debug!(
        url = %source.url,
        events = merged.events.len(),
        future = merged.future_count,
        "Calendar refreshed"
    );

    Ok(merged.events)
}
