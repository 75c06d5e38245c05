//! ICS feed generation.

use crate::event::{Event, EventTime, FEED_TIMEZONE};
use icalendar::{Calendar, Component, EventLike, Property, ValueType};

static PRODUCT_ID: &str = "-//hwr-calendar//Course Calendar//DE";

/// Calendar-level properties of a generated feed
#[derive(Debug, Clone)]
pub struct FeedMetadata {
    /// Shown by calendar clients as the subscription name
    pub name: String,
    /// Prepended to every upstream UID so subscribed events never collide
    /// with a direct Moodle subscription
    pub uid_prefix: String,
}

/// Generate a complete VCALENDAR document for the given events
pub fn generate_feed(events: &[Event], metadata: &FeedMetadata) -> String {
    let mut cal = Calendar::new();
    cal.name(&metadata.name);
    cal.timezone(FEED_TIMEZONE.name());
    cal.append_property(Property::new("METHOD", "REQUEST"));

    let dtstamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ").to_string();

    for event in events {
        let mut ics_event = icalendar::Event::new();
        ics_event.uid(&format!("{}{}", metadata.uid_prefix, event.uid));
        ics_event.summary(&event.summary);
        ics_event.add_property("DTSTAMP", &dtstamp);

        if let Some(ref start) = event.start {
            add_datetime_property(&mut ics_event, "DTSTART", start);
        }
        if let Some(ref end) = event.end {
            add_datetime_property(&mut ics_event, "DTEND", end);
        }

        if let Some(ref desc) = event.description {
            ics_event.description(desc);
        }

        if let Some(ref loc) = event.location {
            ics_event.location(loc);
        }

        ics_event.add_property("PRIORITY", "5");
        ics_event.add_property("CLASS", "PUBLIC");

        cal.push(ics_event.done());
    }

    let cal = cal.done();

    strip_ics_bloat(&cal.to_string())
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with our own
/// - Remove CALSCALE:GREGORIAN (it's the default)
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(PRODUCT_ID);
            result.push_str("\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

/// Add a datetime property with proper formatting based on EventTime variant
fn add_datetime_property(ics_event: &mut icalendar::Event, name: &str, time: &EventTime) {
    match time {
        EventTime::Date(d) => {
            let mut prop = Property::new(name, d.format("%Y%m%d").to_string());
            prop.append_parameter(ValueType::Date);
            ics_event.append_property(prop);
        }
        EventTime::DateTimeUtc(dt) => {
            ics_event.add_property(name, dt.format("%Y%m%dT%H%M%SZ").to_string());
        }
        EventTime::DateTimeFloating(dt) => {
            // Floating times are pinned to the feed timezone on the way out
            let mut prop = Property::new(name, dt.format("%Y%m%dT%H%M%S").to_string());
            prop.add_parameter("TZID", FEED_TIMEZONE.name());
            ics_event.append_property(prop);
        }
        EventTime::DateTimeZoned { datetime, tzid } => {
            let mut prop = Property::new(name, datetime.format("%Y%m%dT%H%M%S").to_string());
            prop.add_parameter("TZID", tzid);
            ics_event.append_property(prop);
        }
    }
}
