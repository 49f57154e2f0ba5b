//! PostgreSQL connection pool and schema bootstrap.
//!
//! The pool is built once by the composition root (server or admin CLI) and
//! shared by reference; nothing here is a process global.

use sqlx::PgPool;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Connection pool tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    /// Seconds to wait for a free connection before the query fails.
    pub acquire_timeout: u64,
    pub idle_timeout: u64,
    pub max_lifetime: u64,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 4,
            acquire_timeout: 30,
            idle_timeout: 600,
            max_lifetime: 1800,
        }
    }
}

/// Shared database handle: the pool plus a once-only schema setup guard.
pub struct Database {
    pool: PgPool,
    initialized: OnceCell<()>,
}

impl Database {
    /// Opens a connection pool to `database_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the first connection cannot be established.
    pub async fn connect(database_url: &str, settings: PoolSettings) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(settings.acquire_timeout))
            .idle_timeout(Duration::from_secs(settings.idle_timeout))
            .max_lifetime(Duration::from_secs(settings.max_lifetime))
            .connect(database_url)
            .await?;

        tracing::info!(
            max_connections = settings.max_connections,
            "Connected to database"
        );

        Ok(Self::from_pool(pool))
    }

    /// Wraps an existing pool (used by `#[sqlx::test]`).
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool,
            initialized: OnceCell::new(),
        }
    }

    /// Ensures the `links` table exists by applying pending migrations.
    ///
    /// Runs the migrations at most once per `Database`; later calls return
    /// immediately. A failed attempt leaves the flag unset so it can be retried.
    ///
    /// # Errors
    ///
    /// Returns the migration error if the schema cannot be applied.
    pub async fn initialize(&self) -> Result<(), MigrateError> {
        self.initialized
            .get_or_try_init(|| async {
                sqlx::migrate!("./migrations").run(&self.pool).await?;
                tracing::info!("Database schema is up to date");
                Ok::<(), MigrateError>(())
            })
            .await?;

        Ok(())
    }

    /// Returns true once [`Self::initialize`] has completed successfully.
    pub fn is_initialized(&self) -> bool {
        self.initialized.initialized()
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
