//! Persistence composition root.

use sqlx::SqlitePool;

use crate::db::ErrorClassifier;
use crate::db::sqlite::{SqliteCategoryRepository, SqliteTaskRepository, SqliteUserRepository};

/// Aggregate of every repository, built once and shared read-only by all
/// request handlers.
#[derive(Clone)]
pub struct Store {
    pub users: SqliteUserRepository,
    pub tasks: SqliteTaskRepository,
    pub categories: SqliteCategoryRepository,
}

impl Store {
    /// Wire all repositories to one pool and one classifier.
    pub fn new(pool: &SqlitePool, classifier: ErrorClassifier) -> Self {
        Self {
            users: SqliteUserRepository::new(pool.clone(), classifier),
            tasks: SqliteTaskRepository::new(pool.clone(), classifier),
            categories: SqliteCategoryRepository::new(pool.clone(), classifier),
        }
    }
}
