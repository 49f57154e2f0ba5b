//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Storage contract for the `links` table.
///
/// Every method is a single atomic operation against the store. Absence is
/// reported as `Ok(None)` / `Ok(false)`, never as an error.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - in-process map
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link with `clicks = 0` and no click timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the code is already taken, and
    /// [`AppError::StorageUnavailable`] on other store failures.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its exact (case-sensitive) code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Returns every link, newest first, ties broken by code ascending.
    async fn list(&self) -> Result<Vec<Link>, AppError>;

    /// Hard-deletes a link. Returns `true` if a row was removed.
    async fn delete(&self, code: &str) -> Result<bool, AppError>;

    /// Atomically bumps `clicks` by one and sets `last_clicked` to now.
    ///
    /// Returns the updated link, or `None` if the code does not exist.
    async fn increment_clicks(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Verifies the store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
