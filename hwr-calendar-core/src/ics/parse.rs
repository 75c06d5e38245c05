//! ICS feed parsing using the icalendar crate's parser.

use crate::error::{CalendarError, CalendarResult};
use crate::event::{Event, EventTime};
use icalendar::{
    DatePerhapsTime,
    parser::{Component, read_calendar, unfold},
};

/// Parse a whole ICS feed into its events.
///
/// Non-VEVENT components (VTIMEZONE and friends) are ignored, as are events
/// without a UID.
pub fn parse_calendar(content: &str) -> CalendarResult<Vec<Event>> {
    let unfolded = unfold(content);
    let calendar =
        read_calendar(&unfolded).map_err(|e| CalendarError::IcsParse(e.to_string()))?;

    let events = calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .filter_map(parse_vevent)
        .collect();

    Ok(events)
}

fn parse_vevent(vevent: &Component<'_>) -> Option<Event> {
    let uid = vevent.find_prop("UID")?.val.to_string();
    let summary = vevent
        .find_prop("SUMMARY")
        .map(|p| unescape_ics_value(p.val.as_ref()))
        .unwrap_or_default();
    let description = vevent
        .find_prop("DESCRIPTION")
        .map(|p| unescape_ics_value(p.val.as_ref()));
    let location = vevent
        .find_prop("LOCATION")
        .map(|p| unescape_ics_value(p.val.as_ref()));

    let start = vevent
        .find_prop("DTSTART")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .map(to_event_time);

    // DTEND wins; otherwise DTSTART + DURATION
    let end = vevent
        .find_prop("DTEND")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .map(to_event_time)
        .or_else(|| {
            let duration = vevent.find_prop("DURATION")?;
            let duration = parse_duration(duration.val.as_ref())?;
            start.as_ref().map(|start| shift(start, duration))
        });

    Some(Event {
        uid,
        summary,
        description,
        location,
        start,
        end,
    })
}

fn to_event_time(value: DatePerhapsTime) -> EventTime {
    use icalendar::CalendarDateTime as Cdt;

    match value {
        DatePerhapsTime::Date(date) => EventTime::Date(date),
        DatePerhapsTime::DateTime(Cdt::Utc(utc)) => EventTime::DateTimeUtc(utc),
        DatePerhapsTime::DateTime(Cdt::Floating(local)) => EventTime::DateTimeFloating(local),
        DatePerhapsTime::DateTime(Cdt::WithTimezone { date_time, tzid }) => {
            EventTime::DateTimeZoned {
                datetime: date_time,
                tzid,
            }
        }
    }
}

/// Parse a DURATION value (P1D, PT1H30M, ...). Negative durations are rejected.
fn parse_duration(value: &str) -> Option<chrono::Duration> {
    if value.starts_with('-') {
        return None;
    }
    let duration = iso8601::duration(value.trim_start_matches('+')).ok()?;
    let std_duration: std::time::Duration = duration.into();
    chrono::Duration::from_std(std_duration).ok()
}

fn shift(time: &EventTime, by: chrono::Duration) -> EventTime {
    match time {
        EventTime::Date(d) => EventTime::Date(*d + by),
        EventTime::DateTimeUtc(dt) => EventTime::DateTimeUtc(*dt + by),
        EventTime::DateTimeFloating(naive) => EventTime::DateTimeFloating(*naive + by),
        EventTime::DateTimeZoned { datetime, tzid } => EventTime::DateTimeZoned {
            datetime: *datetime + by,
            tzid: tzid.clone(),
        },
    }
}

/// Undo TEXT escaping. Unknown escapes are kept as written.
fn unescape_ics_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let escaped = &rest[pos + 1..];
        let mut next = escaped.chars();
        match next.next() {
            Some(c @ (',' | ';' | '\\')) => {
                out.push(c);
                rest = next.as_str();
            }
            Some('n' | 'N') => {
                out.push('\n');
                rest = next.as_str();
            }
            _ => {
                out.push('\\');
                rest = escaped;
            }
        }
    }

    out.push_str(rest);
    out
}
