//! Tests for storage error classification.

use std::error::Error as _;

use crate::db::ErrorClassifier;
use crate::error::ErrorKind;

fn io_error(text: &str) -> sqlx::Error {
    sqlx::Error::Io(std::io::Error::other(text.to_string()))
}

#[test]
fn row_not_found_is_not_found() {
    let err = ErrorClassifier::new().classify("GetTaskByID", "abc", sqlx::Error::RowNotFound);

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.message(), "resource not found");
    assert_eq!(err.details(), Some("GetTaskByID: abc"));
}

#[test]
fn connection_failures_are_temporarily_unavailable() {
    let err = ErrorClassifier::new().classify("CreateUser", "a@x.com", io_error("Connection refused"));

    assert_eq!(err.kind(), ErrorKind::Database);
    assert_eq!(err.message(), "service temporarily unavailable");
    assert!(!err.message().contains("refused"));
    assert_eq!(err.details(), None);
}

#[test]
fn pool_exhaustion_mentions_a_connection_and_is_unavailable() {
    let err = ErrorClassifier::new().classify("GetUserByID", "u1", sqlx::Error::PoolTimedOut);

    assert_eq!(err.kind(), ErrorKind::Database);
    assert_eq!(err.message(), "service temporarily unavailable");
}

#[test]
fn timeouts_are_request_timeout() {
    let classifier = ErrorClassifier::new();

    let err = classifier.classify("UpdateTask", "t1", io_error("statement timeout exceeded"));
    assert_eq!(err.message(), "request timeout");

    let err = classifier.classify("UpdateTask", "t1", io_error("operation timed out"));
    assert_eq!(err.message(), "request timeout");
    assert_eq!(err.details(), None);
}

#[test]
fn everything_else_is_a_generic_database_failure() {
    let err = ErrorClassifier::new().classify(
        "CreateUser",
        "a@x.com",
        sqlx::Error::Protocol("UNIQUE constraint failed: users.email".to_string()),
    );

    assert_eq!(err.kind(), ErrorKind::Database);
    assert_eq!(err.status(), 500);
    assert_eq!(err.message(), "database operation failed");
    assert!(
        err.source()
            .is_some_and(|s| s.to_string().contains("UNIQUE constraint failed"))
    );
}

#[test]
fn missing_row_carries_operation_and_target() {
    let err = ErrorClassifier::new().missing_row("DeleteCategory", "c-42");

    assert!(err.is_not_found());
    assert_eq!(err.details(), Some("DeleteCategory: no row with id 'c-42'"));
}
