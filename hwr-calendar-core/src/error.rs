//! Error types for calendar operations.

use thiserror::Error;

/// Errors that can occur while refreshing or serving a calendar.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("{0}")]
    NotFound(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CalendarError {
    /// Whether this error means "nothing there" rather than "something broke".
    pub fn is_not_found(&self) -> bool {
        matches!(self, CalendarError::NotFound(_))
    }
}

/// Result type alias for calendar operations.
pub type CalendarResult<T> = Result<T, CalendarError>;
