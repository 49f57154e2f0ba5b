//! Shared state injected into every handler.

use std::sync::Arc;

use crate::application::services::LinkService;
use crate::domain::repositories::LinkRepository;

/// Link service over whichever repository the server was started with.
pub type DynLinkService = LinkService<dyn LinkRepository>;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<DynLinkService>,
    /// Public origin used to build `shortUrl` (e.g. `https://tiny.example`).
    pub base_url: Option<String>,
}

impl AppState {
    pub fn new(link_repository: Arc<dyn LinkRepository>, base_url: Option<String>) -> Self {
        Self {
            link_service: Arc::new(LinkService::new(link_repository)),
            base_url: base_url.map(|url| url.trim_end_matches('/').to_string()),
        }
    }

    /// Full short URL for `code`, or a root-relative path without a base URL.
    pub fn short_url(&self, code: &str) -> String {
        match &self.base_url {
            Some(base) => format!("{base}/{code}"),
            None => format!("/{code}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::MemoryLinkRepository;

    #[test]
    fn test_short_url_with_base() {
        let state = AppState::new(
            Arc::new(MemoryLinkRepository::new()),
            Some("https://tiny.example/".to_string()),
        );
        assert_eq!(state.short_url("abc123"), "https://tiny.example/abc123");
    }

    #[test]
    fn test_short_url_without_base() {
        let state = AppState::new(Arc::new(MemoryLinkRepository::new()), None);
        assert_eq!(state.short_url("abc123"), "/abc123");
    }
}
