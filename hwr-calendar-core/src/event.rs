//! Calendar event types.
//!
//! Events come either from a freshly fetched Moodle feed or from the cache,
//! where they are stored as JSON. Both paths produce the same `Event`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Timezone the Moodle feeds are published in. Floating times, all-day dates
/// and unknown TZIDs are read in this zone.
pub const FEED_TIMEZONE: Tz = chrono_tz::Europe::Berlin;

/// A single calendar event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub uid: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub start: Option<EventTime>,
    /// Events without an end never take part in a merge.
    #[serde(default)]
    pub end: Option<EventTime>,
}

impl Event {
    pub fn new(uid: impl Into<String>, summary: impl Into<String>) -> Self {
        Event {
            uid: uid.into(),
            summary: summary.into(),
            description: None,
            location: None,
            start: None,
            end: None,
        }
    }

    /// The end of this event as a UTC instant, if it has one.
    pub fn ends_at(&self) -> Option<DateTime<Utc>> {
        self.end.as_ref().and_then(EventTime::to_utc)
    }

    /// Text that filter options are matched against: summary and description.
    pub fn filter_text(&self) -> String {
        format!(
            "{} {}",
            self.summary,
            self.description.as_deref().unwrap_or_default()
        )
    }
}

/// Start or end of an event, keeping the form it had in the feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventTime {
    /// All-day event date
    Date(NaiveDate),
    /// Date-time with a trailing `Z`
    DateTimeUtc(DateTime<Utc>),
    /// Date-time without zone information
    DateTimeFloating(NaiveDateTime),
    /// Date-time with a TZID parameter
    DateTimeZoned { datetime: NaiveDateTime, tzid: String },
}

impl EventTime {
    /// Resolve to a UTC instant. All-day dates start at local midnight.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            EventTime::Date(date) => Some(localize(&date.and_hms_opt(0, 0, 0)?, FEED_TIMEZONE)),
            EventTime::DateTimeUtc(dt) => Some(*dt),
            EventTime::DateTimeFloating(naive) => Some(localize(naive, FEED_TIMEZONE)),
            EventTime::DateTimeZoned { datetime, tzid } => {
                let tz = tzid.parse::<Tz>().unwrap_or(FEED_TIMEZONE);
                Some(localize(datetime, tz))
            }
        }
    }
}

fn localize(naive: &NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    // Local times skipped by a DST jump have no mapping; read them as UTC.
    let local = tz
        .from_local_datetime(naive)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(naive));
    local.with_timezone(&Utc)
}
