//! Tests for the application error taxonomy.

use std::error::Error as _;

use crate::error::{AppError, AppResult, ErrorKind};

#[test]
fn kinds_map_to_http_affinity() {
    assert_eq!(ErrorKind::NotFound.status(), 404);
    assert_eq!(ErrorKind::Database.status(), 500);
    assert_eq!(ErrorKind::Internal.status(), 500);
    assert_eq!(ErrorKind::BadRequest.status(), 400);
}

#[test]
fn kinds_have_stable_codes() {
    assert_eq!(ErrorKind::NotFound.code(), "NOT_FOUND");
    assert_eq!(ErrorKind::Database.code(), "DATABASE_ERROR");
    assert_eq!(ErrorKind::Internal.code(), "INTERNAL_ERROR");
    assert_eq!(ErrorKind::BadRequest.code(), "BAD_REQUEST");
    assert_eq!(ErrorKind::Database.to_string(), "DATABASE_ERROR");
}

#[test]
fn display_is_the_safe_message_only() {
    let err = AppError::database("database operation failed")
        .with_details("CreateUser")
        .with_source(std::io::Error::other("UNIQUE constraint failed: users.email"));

    assert_eq!(err.to_string(), "database operation failed");
    assert_eq!(err.details(), Some("CreateUser"));
    assert_eq!(err.kind(), ErrorKind::Database);
    assert!(err.source().is_some());
}

#[test]
fn source_is_dropped_for_client_kinds() {
    let err = AppError::bad_request("title is required")
        .with_source(std::io::Error::other("ignored"));

    assert!(err.source().is_none());
    assert_eq!(err.status(), 400);
    assert_eq!(err.message(), "title is required");
}

#[test]
fn not_found_helpers() {
    let err = AppError::not_found("resource not found").with_details("DeleteTask: id 'abc'");
    assert!(err.is_not_found());
    assert_eq!(err.status(), 404);
    assert_eq!(err.details(), Some("DeleteTask: id 'abc'"));

    assert!(!AppError::internal("boom").is_not_found());
}

#[test]
fn app_result_err_returns_error() {
    let result: AppResult<i32> = Err(AppError::not_found("resource not found"));
    assert!(result.is_err());
}
