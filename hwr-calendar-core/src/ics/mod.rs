//! ICS feed generation and parsing.
//!
//! This module handles reading Moodle's .ics feeds and writing the combined
//! feed according to RFC 5545.

mod generate;
mod parse;

pub use generate::{FeedMetadata, generate_feed};
pub use parse::parse_calendar;
