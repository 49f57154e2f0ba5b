//! Link creation, lookup, deletion and click recording.

use std::sync::Arc;

use crate::domain::entities::{Link, LinkInput, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, is_valid_code};
use serde_json::json;
use tracing::{debug, info, warn};

/// How many random candidates are tried before giving up.
pub const MAX_GENERATION_ATTEMPTS: usize = 5;

/// Service exposing the link operations used by the HTTP layer and the CLI.
///
/// Code uniqueness is left to the store: caller-supplied codes are inserted
/// directly and a taken code comes back as [`AppError::Conflict`].
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    pub fn new(link_repository: Arc<L>) -> Self {
        Self { link_repository }
    }

    /// Creates a short link.
    ///
    /// Uses the caller's code (trimmed) when one is given, otherwise generates
    /// one with bounded collision retries.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the custom code is malformed
    /// - [`AppError::Conflict`] if the code is already taken
    /// - [`AppError::GenerationExhausted`] if no free code was found
    /// - [`AppError::StorageUnavailable`] on store failures
    pub async fn create_link(&self, input: LinkInput) -> Result<Link, AppError> {
        let custom_code = input
            .code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty());

        let code = match custom_code {
            Some(code) if !is_valid_code(code) => {
                return Err(AppError::bad_request(
                    "Codes must be 6-8 letters or numbers",
                    json!({ "code": code }),
                ));
            }
            Some(code) => code.to_string(),
            None => self.generate_unique_code().await?,
        };

        let new_link = NewLink {
            code,
            url: input.url,
        };

        match self.link_repository.create(new_link).await {
            Ok(link) => {
                metrics::counter!("links_created_total").increment(1);
                info!(code = %link.code, "Link created");
                Ok(link)
            }
            Err(err @ AppError::Conflict { .. }) => {
                metrics::counter!("link_conflicts_total").increment(1);
                debug!("Short code already taken");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Looks up a link by code.
    ///
    /// Malformed codes return `Ok(None)` without touching the store.
    pub async fn get_link(&self, code: &str) -> Result<Option<Link>, AppError> {
        if !is_valid_code(code) {
            return Ok(None);
        }

        self.link_repository.find_by_code(code).await
    }

    /// Lists all links, newest first.
    pub async fn list_links(&self) -> Result<Vec<Link>, AppError> {
        self.link_repository.list().await
    }

    /// Deletes a link. Returns `false` if there was nothing to delete.
    pub async fn delete_link(&self, code: &str) -> Result<bool, AppError> {
        if !is_valid_code(code) {
            return Ok(false);
        }

        let deleted = self.link_repository.delete(code).await?;
        if deleted {
            metrics::counter!("links_deleted_total").increment(1);
            info!(code, "Link deleted");
        }

        Ok(deleted)
    }

    /// Records one redirect for `code` and returns the updated link.
    ///
    /// Returns `Ok(None)` for malformed or unknown codes.
    pub async fn increment_click(&self, code: &str) -> Result<Option<Link>, AppError> {
        if !is_valid_code(code) {
            return Ok(None);
        }

        let link = self.link_repository.increment_clicks(code).await?;
        if link.is_some() {
            metrics::counter!("redirects_total").increment(1);
        }

        Ok(link)
    }

    /// Checks that the backing store answers.
    pub async fn health_check(&self) -> Result<(), AppError> {
        self.link_repository.ping().await
    }

    /// Draws random codes until one is not in use.
    ///
    /// The existence check is only an optimization: a concurrent insert of the
    /// same code still surfaces as a conflict from the store.
    async fn generate_unique_code(&self) -> Result<String, AppError> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let code = generate_code().map_err(|e| {
                AppError::internal(
                    "Random number generator failed",
                    json!({ "reason": e.to_string() }),
                )
            })?;

            if self.link_repository.find_by_code(&code).await?.is_none() {
                return Ok(code);
            }

            debug!(attempt, "Generated code collided, retrying");
        }

        warn!(
            attempts = MAX_GENERATION_ATTEMPTS,
            "Gave up generating a unique code"
        );
        Err(AppError::GenerationExhausted {
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }
}
