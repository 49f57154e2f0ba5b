//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::db_error::DbFailure;

const LINK_COLUMNS: &str = "id, code, url, clicks, last_clicked, created_at";

#[derive(Debug, FromRow)]
struct LinkRow {
    id: i64,
    code: String,
    url: String,
    clicks: i64,
    last_clicked: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link {
            id: row.id,
            code: row.code,
            url: row.url,
            clicks: row.clicks,
            last_clicked: row.last_clicked,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// All statements are parameterized; each method issues exactly one.
pub struct PgLinkRepository {
    pool: PgPool,
}

impl PgLinkRepository {
    /// Creates a new repository over a shared connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let sql = format!("INSERT INTO links (code, url) VALUES ($1, $2) RETURNING {LINK_COLUMNS}");

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(&new_link.code)
            .bind(&new_link.url)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if DbFailure::classify(&e) == DbFailure::CodeTaken {
                    AppError::conflict("Code already exists", json!({ "code": new_link.code }))
                } else {
                    AppError::from(e)
                }
            })?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE code = $1 LIMIT 1");

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Link::from))
    }

    async fn list(&self) -> Result<Vec<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links ORDER BY created_at DESC, code ASC");

        let rows = sqlx::query_as::<_, LinkRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn delete(&self, code: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn increment_clicks(&self, code: &str) -> Result<Option<Link>, AppError> {
        let sql = format!(
            r#"
            UPDATE links
            SET clicks = clicks + 1,
                last_clicked = NOW()
            WHERE code = $1
            RETURNING {LINK_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Link::from))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
