//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A short link with its click analytics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub url: String,
    pub clicks: i64,
    pub last_clicked: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a link that has never been clicked.
    pub fn new(id: i64, code: String, url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            code,
            url,
            clicks: 0,
            last_clicked: None,
            created_at,
        }
    }
}

/// Row to insert: the resolved code and its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub code: String,
    pub url: String,
}

/// Validated create-link payload.
///
/// `code` is already trimmed, and `None` when the caller left it blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkInput {
    pub url: String,
    pub code: Option<String>,
}
