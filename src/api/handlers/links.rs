//! Handlers for link management endpoints (list, get, create, delete).

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;

use crate::api::dto::links::{CreateLinkRequest, LinkEnvelope, LinkListResponse, LinkResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Lists every link, newest first.
///
/// # Endpoint
///
/// `GET /api/links`
///
/// # Response
///
/// ```json
/// { "links": [ { "code": "abc123", "url": "https://example.com", "clicks": 3, ... } ] }
/// ```
pub async fn list_links_handler(
    State(state): State<AppState>,
) -> Result<Json<LinkListResponse>, AppError> {
    let links = state.link_service.list_links().await?;

    let links = links
        .into_iter()
        .map(|link| {
            let short_url = state.short_url(&link.code);
            LinkResponse::from_link(link, short_url)
        })
        .collect();

    Ok(Json(LinkListResponse { links }))
}

/// Returns a single link with its click counters.
///
/// # Endpoint
///
/// `GET /api/links/{code}`
///
/// # Errors
///
/// Returns 404 Not Found for unknown or malformed codes.
pub async fn get_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkEnvelope>, AppError> {
    let link = state
        .link_service
        .get_link(&code)
        .await?
        .ok_or_else(|| AppError::not_found("Not found", json!({ "code": code })))?;

    let short_url = state.short_url(&link.code);

    Ok(Json(LinkEnvelope {
        link: LinkResponse::from_link(link, short_url),
    }))
}

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/docs", "code": "docs24" }
/// ```
///
/// `code` is optional; a random 6-character code is generated when omitted.
///
/// # Errors
///
/// - 400 Bad Request for malformed JSON, a missing or non-HTTP(S) URL, or a bad code
/// - 409 Conflict if the code is already taken
pub async fn create_link_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkEnvelope>), AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::bad_request("Invalid input", json!({ "reason": rejection.body_text() }))
    })?;

    let input = payload.into_input()?;
    let link = state.link_service.create_link(input).await?;
    let short_url = state.short_url(&link.code);

    Ok((
        StatusCode::CREATED,
        Json(LinkEnvelope {
            link: LinkResponse::from_link(link, short_url),
        }),
    ))
}

/// Permanently deletes a short link.
///
/// # Endpoint
///
/// `DELETE /api/links/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if no link has this code.
pub async fn delete_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let deleted = state.link_service.delete_link(&code).await?;

    if !deleted {
        return Err(AppError::not_found("Not found", json!({ "code": code })));
    }

    Ok(StatusCode::NO_CONTENT)
}
