use std::sync::Arc;

use anyhow::{Context, Result};
use hwr_calendar_core::ics::FeedMetadata;
use hwr_calendar_core::{CalendarStore, Catalog, FeedFetcher, MemoryStore};

use crate::fetch::HttpFeedFetcher;
use crate::kv::RestKvStore;
use crate::settings::Settings;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub store: Arc<dyn CalendarStore>,
    pub fetcher: Arc<dyn FeedFetcher>,
    pub feed: Arc<FeedMetadata>,
    pub cron_secret: Option<Arc<str>>,
}

impl AppState {
    pub fn new(settings: &Settings) -> Result<Self> {
        let catalog = Catalog::builtin().context("Built-in calendar catalog is invalid")?;

        let client = reqwest::Client::builder()
            .timeout(settings.fetch_timeout)
            .user_agent(concat!("hwr-calendar/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        let store: Arc<dyn CalendarStore> = match &settings.kv {
            Some(kv) => {
                tracing::info!(url = %kv.rest_api_url, "Using hosted KV store");
                Arc::new(RestKvStore::new(client.clone(), kv))
            }
            None => {
                tracing::warn!("No KV store configured, cached calendars are kept in memory");
                Arc::new(MemoryStore::new())
            }
        };

        if settings.cron_secret.is_none() {
            tracing::warn!("No cron secret configured, /api/sync will reject every request");
        }

        Ok(AppState {
            catalog: Arc::new(catalog),
            store,
            fetcher: Arc::new(HttpFeedFetcher::new(client)),
            feed: Arc::new(FeedMetadata {
                name: settings.calendar_name.clone(),
                uid_prefix: settings.uid_prefix.clone(),
            }),
            cron_secret: settings.cron_secret.as_deref().map(Arc::from),
        })
    }
}
