//! Key-value storage of merged calendars.
//!
//! A cached calendar lives under its feed URL as the JSON document
//! `{"events": [...]}`.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CalendarResult;
use crate::event::Event;

/// A string key-value store
#[async_trait]
pub trait CalendarStore: Send + Sync {
    /// Value stored under `key`, `None` if there is none
    async fn get(&self, key: &str) -> CalendarResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: String) -> CalendarResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> CalendarResult<()>;
}

/// Stored form of a calendar
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CachedCalendar {
    pub events: Vec<Event>,
}

/// Load the cached events for `key`. A missing entry is an empty calendar.
pub async fn load_events(store: &dyn CalendarStore, key: &str) -> CalendarResult<Vec<Event>> {
    match store.get(key).await? {
        Some(json) => {
            let cached: CachedCalendar = serde_json::from_str(&json)?;
            Ok(cached.events)
        }
        None => Ok(Vec::new()),
    }
}

/// Overwrite the cached events for `key`.
pub async fn save_events(
    store: &dyn CalendarStore,
    key: &str,
    events: &[Event],
) -> CalendarResult<()> {
    #[derive(Serialize)]
    struct Borrowed<'a> {
        events: &'a [Event],
    }

    let json = serde_json::to_string(&Borrowed { events })?;
    store.set(key, json).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalendarError;

    #[tokio::test]
    async fn test_missing_entry_loads_as_empty() {
        let store = MemoryStore::new();

        let events = load_events(&store, "https://example.com/a.ics").await.unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_saved_events_load_back() {
        let store = MemoryStore::new();
        let mut event = Event::new("a", "Lecture");
        event.description = Some("Room 1".to_string());

        save_events(&store, "key", std::slice::from_ref(&event))
            .await
            .unwrap();
        let loaded = load_events(&store, "key").await.unwrap();

        assert_eq!(loaded, vec![event]);
    }

    #[tokio::test]
    async fn test_stored_document_wraps_events() {
        let store = MemoryStore::new();
        save_events(&store, "key", &[Event::new("a", "Lecture")])
            .await
            .unwrap();

        let raw = store.get("key").await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert!(value["events"].is_array());
        assert_eq!(value["events"][0]["uid"], "a");
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_an_error() {
        let store = MemoryStore::new();
        store.set("key", "not json".to_string()).await.unwrap();

        let err = load_events(&store, "key").await.unwrap_err();
        assert!(matches!(err, CalendarError::Serialization(_)));
    }
}
