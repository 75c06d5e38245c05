//! Cron-triggered cache refresh

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, header},
    routing::get,
};

use crate::routes::AppError;
use crate::state::AppState;
use crate::sync::sync_all;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/sync", get(sync))
}

/// GET /api/sync - Refresh every cached calendar. Requires `Authorization: Bearer <cron secret>`.
async fn sync(State(state): State<AppState>, headers: HeaderMap) -> Result<&'static str, AppError> {
    authorize(&state, &headers)?;

    sync_all(&state).await;

    Ok("Ok")
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    let Some(secret) = state.cron_secret.as_deref() else {
        return Err(AppError::Unauthorized);
    };

    let provided = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match provided {
        Some(token) if token == secret => Ok(()),
        _ => {
            tracing::warn!("Rejected sync request with missing or wrong token");
            Err(AppError::Unauthorized)
        }
    }
}
