//! Computer Science (Informatik) timetables published by FB2.

use super::{CalendarSource, FilterOption};
use crate::error::CalendarResult;

const FIELD_OF_STUDY: &str = "Computer Science";
const SEMESTERS: [u8; 6] = [1, 2, 3, 4, 5, 6];
const COURSES: [&str; 2] = ["A", "B"];

fn feed_url(semester: u8, course: &str) -> String {
    format!(
        "https://moodle.hwr-berlin.de/fb2-stundenplan/download.php?doctype=.ics&url=./fb2-stundenplaene/informatik/semester{}/kurs{}",
        semester,
        course.to_lowercase()
    )
}

fn options_for(semester: u8) -> CalendarResult<Vec<FilterOption>> {
    match semester {
        1..=4 => Ok(vec![
            FilterOption::new("hide-english", "Hide English courses", "Englisch")?,
            FilterOption::new("hide-group-1", "Hide courses of group 1", ".*Gruppe 1.*")?,
            FilterOption::new("hide-group-2", "Hide courses of group 2", ".*Gruppe 2.*")?,
        ]),
        _ => Ok(Vec::new()),
    }
}

pub(super) fn sources() -> CalendarResult<Vec<CalendarSource>> {
    let mut sources = Vec::with_capacity(SEMESTERS.len() * COURSES.len());

    for semester in SEMESTERS {
        let options = options_for(semester)?;
        for course in COURSES {
            sources.push(CalendarSource::new(
                FIELD_OF_STUDY,
                semester,
                course,
                feed_url(semester, course),
                options.clone(),
            ));
        }
    }

    Ok(sources)
}
