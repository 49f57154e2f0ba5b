//! DTOs for the link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::domain::entities::{Link, LinkInput};
use crate::error::AppError;
use crate::utils::code_generator::is_valid_code;
use crate::utils::url_validator::validate_destination_url;

/// Request body for `POST /api/links`.
///
/// Fields are optional at the serde level so that a missing `url` is
/// reported through validation rather than as a JSON shape error.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Destination, an absolute `http` or `https` URL.
    #[validate(
        required(message = "URL is required"),
        custom(function = "validate_url_field")
    )]
    pub url: Option<String>,

    /// Optional custom code, 6-8 letters or digits after trimming.
    #[validate(custom(function = "validate_code_field"))]
    pub code: Option<String>,
}

impl CreateLinkRequest {
    /// Trims the code, validates every field and produces a [`LinkInput`].
    ///
    /// A code that is blank after trimming is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] carrying the first failing field's
    /// message.
    pub fn into_input(mut self) -> Result<LinkInput, AppError> {
        self.code = self
            .code
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty());

        self.validate()?;

        let url = self
            .url
            .ok_or_else(|| AppError::bad_request("URL is required", json!({})))?;

        Ok(LinkInput {
            url,
            code: self.code,
        })
    }
}

fn validate_url_field(url: &str) -> Result<(), ValidationError> {
    validate_destination_url(url).map_err(|e| {
        let mut err = ValidationError::new("url");
        err.message = Some(Cow::Borrowed("Enter a valid URL"));
        err.add_param(Cow::Borrowed("reason"), &e.to_string());
        err
    })
}

fn validate_code_field(code: &str) -> Result<(), ValidationError> {
    if is_valid_code(code) {
        return Ok(());
    }

    let mut err = ValidationError::new("code");
    err.message = Some(Cow::Borrowed("Codes must be 6-8 letters or numbers"));
    Err(err)
}

/// JSON representation of a link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub id: i64,
    pub code: String,
    pub url: String,
    pub clicks: i64,
    pub last_clicked: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub short_url: String,
}

impl LinkResponse {
    pub fn from_link(link: Link, short_url: String) -> Self {
        Self {
            id: link.id,
            code: link.code,
            url: link.url,
            clicks: link.clicks,
            last_clicked: link.last_clicked,
            created_at: link.created_at,
            short_url,
        }
    }
}

/// `{"link": ...}` wrapper used by single-link responses.
#[derive(Debug, Serialize)]
pub struct LinkEnvelope {
    pub link: LinkResponse,
}

/// `{"links": [...]}` wrapper used by the list endpoint.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub links: Vec<LinkResponse>,
}
