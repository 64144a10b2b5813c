use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use crate::api::{AppState, create_router};
use crate::db::SqliteDatabase;

#[tokio::test(flavor = "multi_thread")]
async fn health_reports_ok() {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create test database");
    let app = create_router(AppState::new(db.store(), Duration::from_secs(5)));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}
