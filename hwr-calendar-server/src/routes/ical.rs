//! Filtered ICS feed endpoints

use axum::{
    Router,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use hwr_calendar_core::filter::apply_filters;
use hwr_calendar_core::ics::generate_feed;
use hwr_calendar_core::{CalendarSource, refresh_calendar};
use serde::Deserialize;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/ical/{url}", get(feed_by_url))
        .route(
            "/ical/{field_of_study}/{semester}/{course}",
            get(feed_by_path),
        )
}

#[derive(Deserialize)]
pub struct FeedQuery {
    /// Comma-separated option ids
    pub options: Option<String>,
}

/// GET /api/ical/:url - Feed of the calendar with this (percent-encoded) Moodle URL
async fn feed_by_url(
    State(state): State<AppState>,
    Path(url): Path<String>,
    Query(query): Query<FeedQuery>,
) -> Result<Response, AppError> {
    let options = parse_options(query.options.as_deref())?;
    let source = state.catalog.find_by_url(&url)?;

    serve_feed(&state, source, &options).await
}

/// GET /ical/:field_of_study/:semester/:course - Feed of a calendar by its labels
async fn feed_by_path(
    State(state): State<AppState>,
    Path((field_of_study, semester, course)): Path<(String, String, String)>,
    Query(query): Query<FeedQuery>,
) -> Result<Response, AppError> {
    let options = parse_options(query.options.as_deref())?;
    if !is_semester_number(&semester) {
        return Err(AppError::Validation(format!("Invalid semester '{semester}'")));
    }
    let source = state
        .catalog
        .find_by_path(&field_of_study, &semester, &course)?;

    serve_feed(&state, source, &options).await
}

/// A plain decimal number without sign or leading zeros, of any length.
fn is_semester_number(segment: &str) -> bool {
    let digits = !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit());
    digits && (segment == "0" || !segment.starts_with('0'))
}

/// Split the `options` query value into option ids.
///
/// An absent or empty value selects nothing. Otherwise every comma-separated
/// part must be a non-empty kebab-case id.
fn parse_options(raw: Option<&str>) -> Result<Vec<String>, AppError> {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(|id| {
            let valid = !id.is_empty()
                && id
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
            if valid {
                Ok(id.to_string())
            } else {
                Err(AppError::Validation(format!(
                    "Invalid query params: '{id}' is not a valid option id"
                )))
            }
        })
        .collect()
}

async fn serve_feed(
    state: &AppState,
    source: &CalendarSource,
    option_ids: &[String],
) -> Result<Response, AppError> {
    let selected = source.selected_options(option_ids);

    let events = refresh_calendar(
        state.fetcher.as_ref(),
        state.store.as_ref(),
        source,
        Utc::now(),
    )
    .await?;

    let events = apply_filters(events, &selected);
    tracing::debug!(
        url = %source.url,
        options = selected.len(),
        events = events.len(),
        "Serving calendar"
    );

    let body = generate_feed(&events, &state.feed);

    let headers = [
        (header::CONTENT_TYPE, "text/calendar".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", source.file_name()),
        ),
    ];

    Ok((headers, body).into_response())
}
