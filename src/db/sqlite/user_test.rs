//! Tests for SqliteUserRepository.

use crate::db::{SqliteDatabase, User, UserRepository};
use crate::error::ErrorKind;

async fn setup_db() -> SqliteDatabase {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Migration should succeed");
    db
}

fn make_user(email: &str, first_name: &str) -> User {
    User {
        email: email.to_string(),
        password_hash: "$argon2id$v=19$placeholder".to_string(),
        first_name: first_name.to_string(),
        last_name: "Tester".to_string(),
        ..Default::default()
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn user_create_assigns_identity_and_timestamps() {
    let db = setup_db().await;
    let users = db.store().users;

    let mut input = make_user("a@x.com", "A");
    input.id = "client-chosen".to_string();

    let created = users.create(&input).await.expect("Create should succeed");

    assert!(!created.id.is_empty());
    assert_ne!(created.id, "client-chosen");
    assert_eq!(created.email, "a@x.com");
    assert_eq!(created.first_name, "A");
    assert!(created.created_at.timestamp() > 0);
    assert_eq!(created.created_at, created.updated_at);
}

#[tokio::test(flavor = "multi_thread")]
async fn user_create_and_get_round_trip() {
    let db = setup_db().await;
    let users = db.store().users;

    let created = users
        .create(&make_user("round@x.com", "Round"))
        .await
        .expect("Create should succeed");

    let retrieved = users
        .get_by_id(&created.id)
        .await
        .expect("Get should succeed");

    assert_eq!(retrieved, created);
    assert_eq!(retrieved.password_hash, "$argon2id$v=19$placeholder");
}

#[tokio::test(flavor = "multi_thread")]
async fn user_get_nonexistent_returns_not_found() {
    let db = setup_db().await;
    let users = db.store().users;

    let err = users.get_by_id("nonexistent").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test(flavor = "multi_thread")]
async fn user_get_by_email() {
    let db = setup_db().await;
    let users = db.store().users;

    let created = users
        .create(&make_user("lookup@x.com", "Lookup"))
        .await
        .expect("Create should succeed");

    let found = users
        .get_by_email("lookup@x.com")
        .await
        .expect("Lookup should succeed");
    assert_eq!(found.id, created.id);

    let err = users.get_by_email("missing@x.com").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test(flavor = "multi_thread")]
async fn user_duplicate_email_is_database_error_and_rolls_back() {
    let db = setup_db().await;
    let users = db.store().users;

    users
        .create(&make_user("dup@x.com", "First"))
        .await
        .expect("First create should succeed");

    let err = users
        .create(&make_user("dup@x.com", "Second"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Database);
    assert_eq!(err.message(), "database operation failed");
    assert!(!err.message().contains("UNIQUE"));

    let rows: Vec<String> = sqlx::query_scalar("SELECT first_name FROM users WHERE email = ?")
        .bind("dup@x.com")
        .fetch_all(db.pool())
        .await
        .expect("Query should succeed");
    assert_eq!(rows, vec!["First".to_string()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn user_update_replaces_mutable_columns() {
    let db = setup_db().await;
    let users = db.store().users;

    let mut user = users
        .create(&make_user("before@x.com", "Before"))
        .await
        .expect("Create should succeed");

    user.email = "after@x.com".to_string();
    user.first_name = "After".to_string();
    user.last_name = "Updated".to_string();
    user.password_hash = "rotated".to_string();
    users.update(&user).await.expect("Update should succeed");

    let retrieved = users.get_by_id(&user.id).await.expect("Get should succeed");
    assert_eq!(retrieved.email, "after@x.com");
    assert_eq!(retrieved.first_name, "After");
    assert_eq!(retrieved.last_name, "Updated");
    assert_eq!(retrieved.password_hash, "rotated");
    assert_eq!(retrieved.created_at, user.created_at);
}

#[tokio::test(flavor = "multi_thread")]
async fn user_update_nonexistent_returns_not_found() {
    let db = setup_db().await;
    let users = db.store().users;

    let mut ghost = make_user("ghost@x.com", "Ghost");
    ghost.id = "does-not-exist".to_string();

    let err = users.update(&ghost).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
        err.details(),
        Some("UpdateUser: no row with id 'does-not-exist'")
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn user_update_to_taken_email_leaves_row_unchanged() {
    let db = setup_db().await;
    let users = db.store().users;

    users
        .create(&make_user("taken@x.com", "Taken"))
        .await
        .expect("Create should succeed");
    let mut other = users
        .create(&make_user("other@x.com", "Other"))
        .await
        .expect("Create should succeed");

    other.email = "taken@x.com".to_string();
    let err = users.update(&other).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Database);

    let retrieved = users.get_by_id(&other.id).await.expect("Get should succeed");
    assert_eq!(retrieved.email, "other@x.com");
}

#[tokio::test(flavor = "multi_thread")]
async fn user_delete() {
    let db = setup_db().await;
    let users = db.store().users;

    let user = users
        .create(&make_user("gone@x.com", "Gone"))
        .await
        .expect("Create should succeed");

    users.delete(&user.id).await.expect("Delete should succeed");

    let err = users.get_by_id(&user.id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test(flavor = "multi_thread")]
async fn user_delete_nonexistent_returns_not_found() {
    let db = setup_db().await;
    let users = db.store().users;

    let err = users.delete("nonexistent").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.status(), 404);
}
