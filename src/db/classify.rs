//! Storage error classification.
//!
//! All repositories funnel driver failures through [`ErrorClassifier`] so
//! that callers only ever see an [`AppError`]. The text-matching rules are
//! coarse and live here alone; hardening them (typed driver codes, extended
//! SQLite result codes) changes no call site.

use tracing::warn;

use crate::error::AppError;

pub(crate) const NOT_FOUND_MESSAGE: &str = "resource not found";
pub(crate) const UNAVAILABLE_MESSAGE: &str = "service temporarily unavailable";
pub(crate) const TIMEOUT_MESSAGE: &str = "request timeout";
pub(crate) const FAILED_MESSAGE: &str = "database operation failed";

/// Maps raw `sqlx` errors onto the application taxonomy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a storage failure raised by `operation` against `target`.
    ///
    /// 1. `RowNotFound` is `NotFound`.
    /// 2. Text mentioning a connection is `Database` "service temporarily unavailable".
    /// 3. Text mentioning a timeout is `Database` "request timeout".
    /// 4. Anything else is `Database` "database operation failed".
    ///
    /// Driver text is never placed in the message, and `Database` errors
    /// carry no details: the operation and target go to the log only, with
    /// the driver error kept as the source.
    pub fn classify(&self, operation: &str, target: &str, err: sqlx::Error) -> AppError {
        if matches!(err, sqlx::Error::RowNotFound) {
            return AppError::not_found(NOT_FOUND_MESSAGE)
                .with_details(format!("{}: {}", operation, target));
        }

        let text = err.to_string().to_lowercase();
        let message = if text.contains("connection") {
            UNAVAILABLE_MESSAGE
        } else if text.contains("timeout") || text.contains("timed out") {
            TIMEOUT_MESSAGE
        } else {
            FAILED_MESSAGE
        };

        warn!(operation, target, error = %err, classified = message, "classified storage error");

        AppError::database(message).with_source(err)
    }

    /// `NotFound` for a mutation that touched no rows.
    pub fn missing_row(&self, operation: &str, target: &str) -> AppError {
        AppError::not_found(NOT_FOUND_MESSAGE)
            .with_details(format!("{}: no row with id '{}'", operation, target))
    }
}
