//! Shared helper functions for SQLite repositories.
//!
//! Each entity defines its column list and `FromRow` mapping once; the
//! two scan functions below are the only way rows become entities, so a
//! single-row lookup, a multi-row listing and the read-back after an
//! insert can never disagree on column order.

use sqlx::sqlite::{SqliteQueryResult, SqliteRow};
use sqlx::{Executor, FromRow, Sqlite, Transaction};
use tracing::warn;

use crate::db::ErrorClassifier;
use crate::error::AppResult;

/// Fetch exactly one row keyed by `key`. Zero rows is `RowNotFound`.
pub(crate) async fn scan_one<'e, T, E>(
    executor: E,
    sql: &'static str,
    key: &'e str,
) -> Result<T, sqlx::Error>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin + 'static,
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, T>(sql)
        .bind(key)
        .fetch_one(executor)
        .await
}

/// Fetch every row keyed by `key`. Zero rows is an empty vector.
pub(crate) async fn scan_many<'e, T, E>(
    executor: E,
    sql: &'static str,
    key: &'e str,
) -> Result<Vec<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin + 'static,
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, T>(sql)
        .bind(key)
        .fetch_all(executor)
        .await
}

/// Treat a mutation that touched no rows as `NotFound`.
pub(crate) fn ensure_rows_affected(
    result: &SqliteQueryResult,
    classifier: &ErrorClassifier,
    operation: &str,
    id: &str,
) -> AppResult<()> {
    if result.rows_affected() == 0 {
        return Err(classifier.missing_row(operation, id));
    }
    Ok(())
}

/// Commit when every step succeeded, roll back otherwise.
///
/// The transaction is consumed on both paths, so no caller can leave it
/// half-open.
pub(crate) async fn finish<T>(
    tx: Transaction<'static, Sqlite>,
    outcome: AppResult<T>,
    classifier: &ErrorClassifier,
    operation: &str,
    id: &str,
) -> AppResult<T> {
    match outcome {
        Ok(value) => {
            tx.commit()
                .await
                .map_err(|e| classifier.classify(operation, id, e))?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(operation, id, error = %rollback_err, "failed to rollback transaction");
            }
            Err(err)
        }
    }
}
