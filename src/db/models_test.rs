use std::str::FromStr;

use crate::db::{Task, TaskPriority, TaskStatus, User};

#[test]
fn task_status_round_trips_through_strings() {
    for status in [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ] {
        assert_eq!(TaskStatus::from_str(&status.to_string()), Ok(status));
    }
    assert_eq!(TaskStatus::InProgress.to_string(), "in_progress");
}

#[test]
fn task_status_rejects_unknown_values() {
    let err = TaskStatus::from_str("done").unwrap_err();
    assert_eq!(err, "invalid task status: done");
    assert!(TaskStatus::from_str("Pending").is_err());
}

#[test]
fn task_priority_parses_known_values() {
    assert_eq!(TaskPriority::from_str("low"), Ok(TaskPriority::Low));
    assert_eq!(TaskPriority::from_str("medium"), Ok(TaskPriority::Medium));
    assert_eq!(TaskPriority::from_str("high"), Ok(TaskPriority::High));
    assert!(TaskPriority::from_str("urgent").is_err());
}

#[test]
fn defaults_match_a_fresh_task() {
    let task = Task::default();
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.priority, TaskPriority::Medium);
    assert!(task.id.is_empty());
}

#[test]
fn enums_serialize_as_snake_case_strings() {
    assert_eq!(
        serde_json::to_value(TaskStatus::InProgress).unwrap(),
        serde_json::json!("in_progress")
    );
    assert_eq!(
        serde_json::from_value::<TaskPriority>(serde_json::json!("high")).unwrap(),
        TaskPriority::High
    );
    assert!(serde_json::from_value::<TaskStatus>(serde_json::json!("archived")).is_err());
}

#[test]
fn user_password_hash_is_not_serialized() {
    let user = User {
        email: "a@x.com".to_string(),
        password_hash: "secret-hash".to_string(),
        ..Default::default()
    };
    let json = serde_json::to_value(&user).unwrap();
    assert!(json.get("password_hash").is_none());
    assert_eq!(json["email"], "a@x.com");
}
