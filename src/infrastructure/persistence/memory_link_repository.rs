//! In-process link repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Link storage backed by a concurrent hash map.
///
/// Mirrors the PostgreSQL contract: the map's entry API makes code
/// uniqueness atomic, and increments happen under the entry's shard lock.
/// Data lives only as long as the process.
pub struct MemoryLinkRepository {
    links: DashMap<String, Link>,
    next_id: AtomicI64,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self {
            links: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl Default for MemoryLinkRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        match self.links.entry(new_link.code) {
            Entry::Occupied(entry) => Err(AppError::conflict(
                "Code already exists",
                json!({ "code": entry.key() }),
            )),
            Entry::Vacant(entry) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let link = Link::new(id, entry.key().clone(), new_link.url, Utc::now());
                entry.insert(link.clone());
                Ok(link)
            }
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.links.get(code).map(|entry| entry.value().clone()))
    }

    async fn list(&self) -> Result<Vec<Link>, AppError> {
        let mut links: Vec<Link> = self
            .links
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        links.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.code.cmp(&b.code))
        });

        Ok(links)
    }

    async fn delete(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.links.remove(code).is_some())
    }

    async fn increment_clicks(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.links.get_mut(code).map(|mut entry| {
            let link = entry.value_mut();
            link.clicks += 1;
            link.last_clicked = Some(Utc::now());
            link.clone()
        }))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_link(code: &str, url: &str) -> NewLink {
        NewLink {
            code: code.to_string(),
            url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = MemoryLinkRepository::new();

        let created = repo
            .create(new_link("abc123", "https://example.com"))
            .await
            .unwrap();
        assert_eq!(created.clicks, 0);
        assert!(created.last_clicked.is_none());

        let found = repo.find_by_code("abc123").await.unwrap().unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_ids_are_monotonic() {
        let repo = MemoryLinkRepository::new();

        let first = repo.create(new_link("first1", "https://a.com")).await.unwrap();
        let second = repo.create(new_link("second", "https://b.com")).await.unwrap();

        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_duplicate_code_conflicts() {
        let repo = MemoryLinkRepository::new();
        repo.create(new_link("dup123", "https://a.com")).await.unwrap();

        let result = repo.create(new_link("dup123", "https://b.com")).await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
        assert_eq!(repo.len(), 1);
        let kept = repo.find_by_code("dup123").await.unwrap().unwrap();
        assert_eq!(kept.url, "https://a.com");
    }

    #[tokio::test]
    async fn test_codes_are_case_sensitive() {
        let repo = MemoryLinkRepository::new();
        repo.create(new_link("AbCdEf", "https://a.com")).await.unwrap();

        assert!(repo.find_by_code("abcdef").await.unwrap().is_none());
        assert!(repo.create(new_link("abcdef", "https://b.com")).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = MemoryLinkRepository::new();
        repo.create(new_link("gone12", "https://a.com")).await.unwrap();

        assert!(repo.delete("gone12").await.unwrap());
        assert!(!repo.delete("gone12").await.unwrap());
        assert!(repo.find_by_code("gone12").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_increment_missing_code() {
        let repo = MemoryLinkRepository::new();
        assert!(repo.increment_clicks("nope12").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_ordering() {
        let repo = MemoryLinkRepository::new();
        let same_instant = Utc::now();

        for (id, code) in [(1, "bbbbbb"), (2, "aaaaaa")] {
            repo.links.insert(
                code.to_string(),
                Link::new(id, code.to_string(), "https://a.com".to_string(), same_instant),
            );
        }
        repo.links.insert(
            "newest".to_string(),
            Link::new(
                3,
                "newest".to_string(),
                "https://a.com".to_string(),
                same_instant + chrono::Duration::seconds(1),
            ),
        );

        let codes: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.code)
            .collect();

        assert_eq!(codes, vec!["newest", "aaaaaa", "bbbbbb"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_are_not_lost() {
        let repo = Arc::new(MemoryLinkRepository::new());
        repo.create(new_link("hot123", "https://a.com")).await.unwrap();

        let handles: Vec<_> = (0..200)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.increment_clicks("hot123").await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let link = repo.find_by_code("hot123").await.unwrap().unwrap();
        assert_eq!(link.clicks, 200);
        assert!(link.last_clicked.is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_same_code() {
        let repo = Arc::new(MemoryLinkRepository::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.create(new_link("race12", &format!("https://{i}.com")))
                        .await
                })
            })
            .collect();

        let mut created = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(AppError::Conflict { .. }) => conflicts += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(conflicts, 15);
        assert_eq!(repo.len(), 1);
    }
}
