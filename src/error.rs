//! Application error type and its HTTP mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::utils::db_error::DbFailure;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload returned to API clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Errors produced by link operations.
///
/// "No such code" is deliberately absent: lookups return `Option`/`bool`
/// and handlers build [`AppError::NotFound`] at the HTTP edge.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    Conflict { message: String, details: Value },

    #[error("Unable to generate a unique short code after {attempts} attempts")]
    GenerationExhausted { attempts: usize },

    #[error("Storage unavailable: {message}")]
    StorageUnavailable { message: String },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::GenerationExhausted { .. }
            | AppError::StorageUnavailable { .. }
            | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into the client-facing payload.
    ///
    /// Server-side failures are reported with a generic message; the
    /// underlying cause stays in the logs.
    pub fn to_error_info(&self) -> ErrorInfo {
        match self {
            AppError::Validation { message, details } => ErrorInfo {
                code: "validation_error",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::NotFound { message, details } => ErrorInfo {
                code: "not_found",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::Conflict { message, details } => ErrorInfo {
                code: "conflict",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::GenerationExhausted { .. }
            | AppError::StorageUnavailable { .. }
            | AppError::Internal { .. } => ErrorInfo {
                code: "internal_error",
                message: "Internal server error".to_string(),
                details: json!({}),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match DbFailure::classify(&e) {
            DbFailure::CodeTaken => AppError::conflict("Code already exists", json!({})),
            DbFailure::PoolExhausted => {
                AppError::storage("Timed out waiting for a database connection")
            }
            DbFailure::Unavailable => AppError::storage(e.to_string()),
        }
    }
}

/// Fields whose message wins when several fail, in order. Others follow by name.
const FIELD_PRIORITY: &[&str] = &["url", "code"];

fn field_rank(field: &str) -> usize {
    FIELD_PRIORITY
        .iter()
        .position(|known| *known == field)
        .unwrap_or(FIELD_PRIORITY.len())
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| {
            field_rank(&a.0)
                .cmp(&field_rank(&b.0))
                .then_with(|| a.0.cmp(&b.0))
        });

        let message = fields
            .iter()
            .flat_map(|(_, errs)| errs.iter())
            .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid input".to_string());

        AppError::bad_request(message, json!({ "fields": errors }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::bad_request("bad", json!({})).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::not_found("missing", json!({})).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::conflict("taken", json!({})).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::GenerationExhausted { attempts: 5 }.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::storage("pool timed out").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_errors_hide_details() {
        let info = AppError::storage("connection refused (os error 111)").to_error_info();

        assert_eq!(info.code, "internal_error");
        assert!(!info.message.contains("connection refused"));
    }

    #[test]
    fn test_client_errors_keep_message() {
        let info = AppError::conflict("Code already exists", json!({ "code": "abc123" }))
            .to_error_info();

        assert_eq!(info.code, "conflict");
        assert_eq!(info.message, "Code already exists");
        assert_eq!(info.details["code"], "abc123");
    }

    #[test]
    fn test_pool_timeout_is_storage_unavailable() {
        let err: AppError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, AppError::StorageUnavailable { .. }));
    }

    #[test]
    fn test_row_not_found_is_storage_error() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::StorageUnavailable { .. }));
    }

    #[test]
    fn test_generation_exhausted_message() {
        let err = AppError::GenerationExhausted { attempts: 5 };
        assert!(err.to_string().contains("5 attempts"));
    }

    #[test]
    fn test_validation_message_prefers_url_over_code() {
        let mut errors = validator::ValidationErrors::new();

        let mut code_err = validator::ValidationError::new("code");
        code_err.message = Some("Codes must be 6-8 letters or numbers".into());
        errors.add("code", code_err);

        let mut url_err = validator::ValidationError::new("required");
        url_err.message = Some("URL is required".into());
        errors.add("url", url_err);

        let err: AppError = errors.into();

        match err {
            AppError::Validation { message, .. } => assert_eq!(message, "URL is required"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
