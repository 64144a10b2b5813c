//! End-to-end repository scenarios across all three entities.

use std::sync::Arc;

use crate::db::{
    SqliteDatabase, Task, TaskPriority, TaskRepository, TaskStatus, User, UserRepository,
};
use crate::error::ErrorKind;

async fn setup_db() -> SqliteDatabase {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Migration should succeed");
    db
}

#[tokio::test(flavor = "multi_thread")]
async fn user_task_lifecycle() {
    let db = setup_db().await;
    let store = db.store();

    let user = store
        .users
        .create(&User {
            email: "a@x.com".to_string(),
            first_name: "A".to_string(),
            password_hash: "hash".to_string(),
            ..Default::default()
        })
        .await
        .expect("Create user should succeed");
    assert!(!user.id.is_empty());
    assert!(user.created_at.timestamp() > 0);

    let task = store
        .tasks
        .create(&Task {
            user_id: user.id.clone(),
            title: "T".to_string(),
            priority: TaskPriority::Medium,
            status: TaskStatus::Pending,
            ..Default::default()
        })
        .await
        .expect("Create task should succeed");
    assert!(!task.id.is_empty());

    let tasks = store
        .tasks
        .get_all_for_user(&user.id)
        .await
        .expect("List should succeed");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "T");

    store
        .tasks
        .delete(&task.id)
        .await
        .expect("Delete should succeed");

    let err = store.tasks.get_by_id(&task.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_user_cascades_to_tasks() {
    let db = setup_db().await;
    let store = db.store();

    let user = store
        .users
        .create(&User {
            email: "cascade@x.com".to_string(),
            password_hash: "hash".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    let task = store
        .tasks
        .create(&Task {
            user_id: user.id.clone(),
            title: "Owned".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    store.users.delete(&user.id).await.unwrap();

    assert!(store.tasks.get_by_id(&task.id).await.unwrap_err().is_not_found());
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_creates_all_commit() {
    let db = setup_db().await;
    let store = Arc::new(db.store());

    let user = store
        .users
        .create(&User {
            email: "busy@x.com".to_string(),
            password_hash: "hash".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let store = Arc::clone(&store);
            let user_id = user.id.clone();
            tokio::spawn(async move {
                store
                    .tasks
                    .create(&Task {
                        user_id,
                        title: format!("task {}", i),
                        ..Default::default()
                    })
                    .await
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        let task = handle.await.expect("join").expect("Create should succeed");
        ids.push(task.id);
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 16);

    let tasks = store.tasks.get_all_for_user(&user.id).await.unwrap();
    assert_eq!(tasks.len(), 16);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_updates_are_last_writer_wins() {
    let db = setup_db().await;
    let store = db.store();

    let user = store
        .users
        .create(&User {
            email: "lww@x.com".to_string(),
            password_hash: "hash".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    let task = store
        .tasks
        .create(&Task {
            user_id: user.id.clone(),
            title: "original".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let first = Task {
        title: "first writer".to_string(),
        ..task.clone()
    };
    let second = Task {
        title: "second writer".to_string(),
        status: TaskStatus::Completed,
        ..task.clone()
    };

    store.tasks.update(&first).await.unwrap();
    store.tasks.update(&second).await.unwrap();

    let retrieved = store.tasks.get_by_id(&task.id).await.unwrap();
    assert_eq!(retrieved.title, "second writer");
    assert_eq!(retrieved.status, TaskStatus::Completed);
}

#[tokio::test(flavor = "multi_thread")]
async fn create_abandoned_while_waiting_for_a_connection_leaves_no_row() {
    let db = setup_db().await;
    let store = db.store();

    let user = store
        .users
        .create(&User {
            email: "cancel@x.com".to_string(),
            password_hash: "hash".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    // Hold the only pooled connection so the create cannot finish, then
    // abandon it at the deadline.
    let mut guard = db.pool().begin().await.unwrap();
    let task = Task {
        user_id: user.id.clone(),
        title: "never".to_string(),
        ..Default::default()
    };
    let pending = store.tasks.create(&task);
    let timed_out = tokio::time::timeout(std::time::Duration::from_millis(50), pending).await;
    assert!(timed_out.is_err());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
        .fetch_one(&mut *guard)
        .await
        .unwrap();
    assert_eq!(count, 0);
    guard.rollback().await.unwrap();

    assert!(store.tasks.get_all_for_user(&user.id).await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn create_dropped_inside_open_transaction_rolls_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite://{}", dir.path().join("cancel.db").display());
    let db = SqliteDatabase::connect(&url, 2)
        .await
        .expect("Connect should succeed");
    db.migrate().await.expect("Migration should succeed");
    let store = db.store();

    let user = store
        .users
        .create(&User {
            email: "midflight@x.com".to_string(),
            password_hash: "hash".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    // Take the write lock on one connection. The create begins its own
    // transaction on the other and blocks on INSERT until the deadline.
    let mut guard = db.pool().acquire().await.unwrap();
    sqlx::query("BEGIN IMMEDIATE")
        .execute(&mut *guard)
        .await
        .unwrap();

    let task = Task {
        user_id: user.id.clone(),
        title: "abandoned".to_string(),
        ..Default::default()
    };
    let timed_out =
        tokio::time::timeout(std::time::Duration::from_millis(200), store.tasks.create(&task))
            .await;
    assert!(timed_out.is_err());

    sqlx::query("ROLLBACK").execute(&mut *guard).await.unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
        .fetch_one(&mut *guard)
        .await
        .unwrap();
    assert_eq!(count, 0);
    drop(guard);

    let after = store
        .tasks
        .create(&Task {
            user_id: user.id.clone(),
            title: "after".to_string(),
            ..Default::default()
        })
        .await
        .expect("Create after cancellation should succeed");

    let tasks = store.tasks.get_all_for_user(&user.id).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, after.id);
    db.close().await;
}
