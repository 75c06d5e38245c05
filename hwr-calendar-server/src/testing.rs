//! Fakes shared by the server's unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use hwr_calendar_core::ics::FeedMetadata;
use hwr_calendar_core::{CalendarError, CalendarResult, Catalog, FeedFetcher, MemoryStore};

use crate::state::AppState;

/// Serves the same small feed for every URL, relative to the current time
pub struct FixtureFeed;

/// Fails every fetch
pub struct FailingFeed;

#[async_trait]
impl FeedFetcher for FixtureFeed {
    async fn fetch(&self, _url: &str) -> CalendarResult<String> {
        Ok(fixture_feed(Utc::now()))
    }
}

#[async_trait]
impl FeedFetcher for FailingFeed {
    async fn fetch(&self, url: &str) -> CalendarResult<String> {
        Err(CalendarError::Fetch(format!("{url} is unreachable")))
    }
}

fn vevent(uid: &str, summary: &str, description: &str, end: Option<DateTime<Utc>>) -> String {
    let start = end.unwrap_or_else(Utc::now) - Duration::hours(2);
    let mut lines = format!(
        "BEGIN:VEVENT\r\nUID:{uid}\r\nSUMMARY:{summary}\r\nDESCRIPTION:{description}\r\nDTSTART:{}\r\n",
        start.format("%Y%m%dT%H%M%SZ")
    );
    if let Some(end) = end {
        lines.push_str(&format!("DTEND:{}\r\n", end.format("%Y%m%dT%H%M%SZ")));
    }
    lines.push_str("END:VEVENT\r\n");
    lines
}

pub fn fixture_feed(now: DateTime<Utc>) -> String {
    [
        "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Moodle//Stundenplan//DE\r\n".to_string(),
        vevent("expired", "Einführung", "Raum 1", Some(now - Duration::days(1))),
        vevent("maths", "Mathematik", "Gruppe 1", Some(now + Duration::days(1))),
        vevent("english", "Englisch B2", "Raum 2", Some(now + Duration::days(2))),
        vevent("seminar", "Seminar", "Gruppe 2", Some(now + Duration::days(3))),
        vevent("open-ended", "Sprechstunde", "Raum 3", None),
        "END:VCALENDAR\r\n".to_string(),
    ]
    .concat()
}

/// State backed by a `MemoryStore` and `FixtureFeed`
pub fn state_with(cron_secret: Option<&str>) -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());

    let state = AppState {
        catalog: Arc::new(Catalog::builtin().expect("builtin catalog")),
        store: store.clone(),
        fetcher: Arc::new(FixtureFeed),
        feed: Arc::new(FeedMetadata {
            name: "HWR Calendar".to_string(),
            uid_prefix: "hwr-calendar-".to_string(),
        }),
        cron_secret: cron_secret.map(Arc::from),
    };

    (state, store)
}
