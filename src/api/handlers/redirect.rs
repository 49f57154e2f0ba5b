//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its destination and records the click.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Reject malformed codes without querying storage
/// 2. Increment `clicks` and set `last_clicked` in one atomic update
/// 3. Return 302 Found with the destination in `Location`
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let Some(link) = state.link_service.increment_click(&code).await? else {
        return Err(AppError::not_found("Not found", json!({ "code": code })));
    };

    debug!(code = %link.code, clicks = link.clicks, "Redirecting");

    Ok((StatusCode::FOUND, [(header::LOCATION, link.url)]).into_response())
}
