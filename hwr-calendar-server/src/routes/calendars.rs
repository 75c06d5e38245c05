//! Catalog listing for building subscription links

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/calendars", get(list_calendars))
}

/// Calendar info returned by API
#[derive(Serialize)]
pub struct CalendarInfo {
    pub field_of_study: String,
    pub field_of_study_id: String,
    pub semester: u8,
    pub course: String,
    pub url: String,
    /// Feed path addressed by labels
    pub feed_path: String,
    /// Feed path addressed by the Moodle URL
    pub ical_path: String,
    pub options: Vec<OptionInfo>,
}

#[derive(Serialize)]
pub struct OptionInfo {
    pub id: String,
    pub name: String,
}

/// GET /api/calendars - List all calendars and their options
async fn list_calendars(State(state): State<AppState>) -> Json<Vec<CalendarInfo>> {
    let calendars = state
        .catalog
        .sources()
        .iter()
        .map(|source| CalendarInfo {
            field_of_study: source.field_of_study.clone(),
            field_of_study_id: source.field_of_study_id.clone(),
            semester: source.semester,
            course: source.course.clone(),
            url: source.url.clone(),
            feed_path: format!(
                "/ical/{}/{}/{}",
                source.field_of_study_id, source.semester, source.course
            ),
            ical_path: format!(
                "/api/ical/{}",
                url::form_urlencoded::byte_serialize(source.url.as_bytes()).collect::<String>()
            ),
            options: source
                .options
                .iter()
                .map(|option| OptionInfo {
                    id: option.id.clone(),
                    name: option.name.clone(),
                })
                .collect(),
        })
        .collect();

    Json(calendars)
}
