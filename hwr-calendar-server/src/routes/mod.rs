pub mod calendars;
pub mod ical;
pub mod sync;

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hwr_calendar_core::CalendarError;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(ical::router())
        .merge(sync::router())
        .merge(calendars::router())
        .with_state(state)
}

/// Errors a handler can answer with. Bodies are plain text since most
/// callers are calendar clients.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Validation(String),
    Unauthorized,
    Internal(CalendarError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
            AppError::Internal(e) => {
                tracing::error!(error = %e, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Unknown error").into_response()
            }
        }
    }
}

impl From<CalendarError> for AppError {
    fn from(err: CalendarError) -> Self {
        match err {
            CalendarError::NotFound(msg) => AppError::NotFound(msg),
            other => AppError::Internal(other),
        }
    }
}
