//! SQLite database connection and migration management.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{info, instrument};

use crate::db::{ErrorClassifier, Store};
use crate::error::{AppError, AppResult};

// Embed migrations from data/sql/sqlite/ at compile time
static MIGRATOR: Migrator = sqlx::migrate!("./data/sql/sqlite");

/// Process-wide database handle.
///
/// Created once at startup, handed to the [`Store`] by reference and torn
/// down with [`SqliteDatabase::close`]. Repositories never reach for a
/// global; they hold a clone of the pool they were built with.
pub struct SqliteDatabase {
    pool: SqlitePool,
    classifier: ErrorClassifier,
}

impl SqliteDatabase {
    /// Open (creating if missing) the database at `url`.
    ///
    /// Establishes one connection eagerly so an unreachable database fails
    /// here rather than on the first request.
    #[instrument]
    pub async fn connect(url: &str, max_connections: u32) -> AppResult<Self> {
        let classifier = ErrorClassifier::new();

        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| classifier.classify("Connect", url, e))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| classifier.classify("Connect", url, e))?;

        info!("database connection established");
        Ok(Self { pool, classifier })
    }

    /// Create an in-memory database (useful for testing).
    ///
    /// Every connection to `:memory:` sees its own database, so the pool is
    /// pinned to a single connection that is never recycled.
    pub async fn in_memory() -> AppResult<Self> {
        let classifier = ErrorClassifier::new();

        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| classifier.classify("Connect", ":memory:", e))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| classifier.classify("Connect", ":memory:", e))?;

        Ok(Self { pool, classifier })
    }

    /// Apply embedded migrations. Safe to run repeatedly.
    pub async fn migrate(&self) -> AppResult<()> {
        MIGRATOR.run(&self.pool).await.map_err(|e| {
            AppError::database("database migration failed")
                .with_details("Migrate")
                .with_source(e)
        })?;

        info!("database migrations complete");
        Ok(())
    }

    /// Underlying pool, for tests and ad-hoc statements.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Build the repository aggregate on this handle.
    pub fn store(&self) -> Store {
        Store::new(&self.pool, self.classifier)
    }

    /// Drain and close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("database connection closed");
    }
}
