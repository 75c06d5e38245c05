//! Combining cached past events with freshly fetched future events.

use chrono::{DateTime, Utc};

use crate::event::Event;

/// Result of a merge: past events from the cache followed by future events
/// from the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Merged {
    pub events: Vec<Event>,
    /// How many of `events` end after the merge time
    pub future_count: usize,
}

impl Merged {
    pub fn has_future(&self) -> bool {
        self.future_count > 0
    }
}

/// Merge cached and fetched events at `now`.
///
/// Cached events that already ended are kept, everything else in the cache
/// is superseded by the feed. Fetched events that have not ended yet are
/// kept. Events without an end, or ending exactly at `now`, are dropped.
pub fn merge_events(cached: Vec<Event>, fetched: Vec<Event>, now: DateTime<Utc>) -> Merged {
    let past = cached
        .into_iter()
        .filter(|event| event.ends_at().is_some_and(|end| end < now));

    let future: Vec<Event> = fetched
        .into_iter()
        .filter(|event| event.ends_at().is_some_and(|end| end > now))
        .collect();
    let future_count = future.len();

    let events = past.chain(future).collect();

    Merged {
        events,
        future_count,
    }
}
