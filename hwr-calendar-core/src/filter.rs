//! Removing events hidden by the selected filter options.

use crate::event::Event;
use crate::sources::FilterOption;

/// Keep only the events no selected option wants removed.
pub fn apply_filters(events: Vec<Event>, options: &[&FilterOption]) -> Vec<Event> {
    if options.is_empty() {
        return events;
    }

    events
        .into_iter()
        .filter(|event| {
            let text = event.filter_text();
            !options.iter().any(|option| option.should_remove(&text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(uid: &str, summary: &str, description: Option<&str>) -> Event {
        let mut event = Event::new(uid, summary);
        event.description = description.map(str::to_string);
        event
    }

    fn options() -> Vec<FilterOption> {
        vec![
            FilterOption::new("hide-english", "Hide English courses", "Englisch").unwrap(),
            FilterOption::new("hide-group-1", "Hide courses of group 1", ".*Gruppe 1.*").unwrap(),
        ]
    }

    #[test]
    fn test_no_options_keeps_everything() {
        let events = vec![event("1", "Englisch", None), event("2", "Mathe", None)];

        assert_eq!(apply_filters(events.clone(), &[]), events);
    }

    #[test]
    fn test_event_removed_when_any_option_matches() {
        let options = options();
        let selected: Vec<&FilterOption> = options.iter().collect();
        let events = vec![
            event("1", "Englisch B2", None),
            event("2", "Mathematik", Some("Gruppe 1, Raum 6B")),
            event("3", "Mathematik", Some("Gruppe 2, Raum 6A")),
        ];

        let kept = apply_filters(events, &selected);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].uid, "3");
    }

    #[test]
    fn test_match_can_span_summary_and_description() {
        let option = FilterOption::new("span", "Span", "Labor Gruppe").unwrap();
        let events = vec![event("1", "Labor", Some("Gruppe 2"))];

        assert!(apply_filters(events, &[&option]).is_empty());
    }

    #[test]
    fn test_only_selected_options_apply() {
        let options = options();
        let selected = vec![&options[1]];
        let events = vec![event("1", "Englisch B2", None)];

        assert_eq!(apply_filters(events, &selected).len(), 1);
    }
}
