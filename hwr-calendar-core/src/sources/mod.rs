//! The static table of calendar sources and their filter options.

mod computer_science;

use regex::Regex;

use crate::error::{CalendarError, CalendarResult};

/// A named rule that removes matching events from a feed
#[derive(Debug, Clone)]
pub struct FilterOption {
    pub id: String,
    pub name: String,
    pattern: Regex,
}

impl FilterOption {
    pub fn new(id: &str, name: &str, pattern: &str) -> CalendarResult<Self> {
        let pattern = Regex::new(pattern).map_err(|e| {
            CalendarError::Config(format!("Invalid pattern for option '{id}': {e}"))
        })?;

        Ok(FilterOption {
            id: id.to_string(),
            name: name.to_string(),
            pattern,
        })
    }

    /// Whether an event with this filter text should be hidden
    pub fn should_remove(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// One Moodle feed: a course group of one semester of a field of study
#[derive(Debug, Clone)]
pub struct CalendarSource {
    pub field_of_study: String,
    /// URL-safe form of `field_of_study`
    pub field_of_study_id: String,
    pub semester: u8,
    pub course: String,
    /// Upstream ICS URL, also the cache key
    pub url: String,
    pub options: Vec<FilterOption>,
}

impl CalendarSource {
    pub fn new(
        field_of_study: &str,
        semester: u8,
        course: &str,
        url: String,
        options: Vec<FilterOption>,
    ) -> Self {
        CalendarSource {
            field_of_study: field_of_study.to_string(),
            field_of_study_id: slug::slugify(field_of_study),
            semester,
            course: course.to_string(),
            url,
            options,
        }
    }

    /// The options of this calendar whose ids were requested. Unknown ids are ignored.
    pub fn selected_options<S: AsRef<str>>(&self, ids: &[S]) -> Vec<&FilterOption> {
        self.options
            .iter()
            .filter(|option| ids.iter().any(|id| id.as_ref() == option.id))
            .collect()
    }

    /// Download file name offered to calendar clients
    pub fn file_name(&self) -> String {
        format!(
            "{} Semester {} Kurs {}.ics",
            self.field_of_study, self.semester, self.course
        )
    }
}

/// All calendar sources known to the service
#[derive(Debug, Clone)]
pub struct Catalog {
    sources: Vec<CalendarSource>,
}

impl Catalog {
    pub fn new(sources: Vec<CalendarSource>) -> Self {
        Catalog { sources }
    }

    /// The built-in table of HWR feeds
    pub fn builtin() -> CalendarResult<Self> {
        Ok(Catalog::new(computer_science::sources()?))
    }

    pub fn sources(&self) -> &[CalendarSource] {
        &self.sources
    }

    pub fn find_by_url(&self, url: &str) -> CalendarResult<&CalendarSource> {
        self.sources
            .iter()
            .find(|source| source.url == url)
            .ok_or_else(|| CalendarError::NotFound("Calendar not found".to_string()))
    }

    /// Look a calendar up by field of study id, semester and course label.
    ///
    /// `semester` is the path segment as written. Only the canonical decimal
    /// form of a semester number matches, so `"01"` is not semester 1.
    pub fn find_by_path(
        &self,
        field_of_study_id: &str,
        semester: &str,
        course: &str,
    ) -> CalendarResult<&CalendarSource> {
        let in_field: Vec<&CalendarSource> = self
            .sources
            .iter()
            .filter(|source| source.field_of_study_id == field_of_study_id)
            .collect();

        let Some(first) = in_field.first() else {
            return Err(CalendarError::NotFound(format!(
                "Field of study '{field_of_study_id}' not found"
            )));
        };
        let field_name = first.field_of_study.clone();

        let in_semester: Vec<&CalendarSource> = in_field
            .into_iter()
            .filter(|source| source.semester.to_string() == semester)
            .collect();

        if in_semester.is_empty() {
            return Err(CalendarError::NotFound(format!(
                "Semester '{semester}' for {field_name} not found"
            )));
        }

        in_semester
            .into_iter()
            .find(|source| source.course == course)
            .ok_or_else(|| {
                CalendarError::NotFound(format!(
                    "Course '{course}' for semester {semester} in {field_name} not found"
                ))
            })
    }
}
