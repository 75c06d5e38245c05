//! Core of the HWR course calendar service.
//!
//! This crate holds everything that does not need a network stack:
//! - `Event` and ICS parsing/generation
//! - the static catalog of Moodle feeds and their filter options
//! - merging cached past events with fetched future events
//! - the `CalendarStore` and `FeedFetcher` seams the server plugs into

pub mod error;
pub mod event;
pub mod filter;
pub mod ics;
pub mod merge;
pub mod refresh;
pub mod sources;
pub mod store;

pub use error::{CalendarError, CalendarResult};
pub use event::{Event, EventTime};
pub use refresh::{FeedFetcher, refresh_calendar};
pub use sources::{CalendarSource, Catalog, FilterOption};
pub use store::{CalendarStore, MemoryStore};
