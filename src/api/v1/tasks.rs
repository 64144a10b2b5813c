//! Task handlers.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::api::{ApiResponse, AppState, ErrorResponse};
use crate::db::{Task, TaskPriority, TaskRepository, TaskStatus};
use crate::error::AppResult;

use super::{Created, UserIdQuery, created, parse_field, required};

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct TaskResponse {
    #[schema(example = "0b8e3c55-1d2f-4a0e-8c1b-7f6d5e4c3b2a")]
    pub id: String,
    pub user_id: String,
    pub category_id: Option<String>,
    #[schema(example = "Write release notes")]
    pub title: String,
    pub description: String,
    #[schema(example = "medium")]
    pub priority: String,
    #[schema(example = "in_progress")]
    pub status: String,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(t: Task) -> Self {
        Self {
            id: t.id,
            user_id: t.user_id,
            category_id: t.category_id,
            title: t.title,
            description: t.description,
            priority: t.priority.as_str().to_string(),
            status: t.status.as_str().to_string(),
            due_date: t.due_date,
            completed_at: t.completed_at,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    pub user_id: String,
    pub category_id: Option<String>,
    #[schema(example = "Write release notes")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// low, medium (default), high
    #[schema(example = "high")]
    pub priority: Option<String>,
    /// pending (default), in_progress, completed
    #[schema(example = "pending")]
    pub status: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Full replacement of a task's mutable fields. `category_id` and `due_date`
/// are cleared when omitted; `priority` and `status` keep their stored
/// values when omitted.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTaskRequest {
    pub category_id: Option<String>,
    #[schema(example = "Write release notes")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[schema(example = "high")]
    pub priority: Option<String>,
    /// Moving to completed stamps completed_at; moving away clears it
    #[schema(example = "completed")]
    pub status: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

impl UpdateTaskRequest {
    /// Check required fields and parse the enum strings before any storage
    /// work happens.
    fn parse(&self) -> AppResult<(Option<TaskPriority>, Option<TaskStatus>)> {
        required("title", &self.title)?;
        let priority = self
            .priority
            .as_deref()
            .map(|p| parse_field("priority", p))
            .transpose()?;
        let status = self
            .status
            .as_deref()
            .map(|s| parse_field("status", s))
            .transpose()?;
        Ok((priority, status))
    }

    fn apply_to(
        self,
        priority: Option<TaskPriority>,
        status: Option<TaskStatus>,
        target: &mut Task,
    ) {
        let status = status.unwrap_or(target.status);
        target.completed_at = completion_time(target.status, status, target.completed_at);
        target.category_id = self.category_id.filter(|c| !c.is_empty());
        target.title = self.title;
        target.description = self.description;
        target.priority = priority.unwrap_or(target.priority);
        target.status = status;
        target.due_date = self.due_date;
    }
}

/// completed_at after a status transition.
pub(crate) fn completion_time(
    from: TaskStatus,
    to: TaskStatus,
    current: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    match (from, to) {
        (TaskStatus::Completed, TaskStatus::Completed) => current.or_else(|| Some(Utc::now())),
        (_, TaskStatus::Completed) => Some(Utc::now()),
        _ => None,
    }
}

// =============================================================================
// Handlers
// =============================================================================

#[utoipa::path(
    post,
    path = "/api/v1/tasks",
    tag = "tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = ApiResponse<TaskResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Database error, including unknown user or category", body = ErrorResponse)
    )
)]
#[instrument(skip(state, body))]
pub async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> AppResult<Created<Json<ApiResponse<TaskResponse>>>> {
    let Json(req) = body?;
    required("user_id", &req.user_id)?;
    required("title", &req.title)?;
    let priority = match req.priority {
        Some(p) => parse_field("priority", &p)?,
        None => TaskPriority::default(),
    };
    let status = match req.status {
        Some(s) => parse_field("status", &s)?,
        None => TaskStatus::default(),
    };

    let task = Task {
        user_id: req.user_id,
        category_id: req.category_id.filter(|c| !c.is_empty()),
        title: req.title,
        description: req.description,
        priority,
        status,
        due_date: req.due_date,
        completed_at: completion_time(TaskStatus::Pending, status, None),
        ..Default::default()
    };
    let task = state
        .with_deadline(state.store().tasks.create(&task))
        .await?;
    info!(task_id = %task.id, user_id = %task.user_id, "Task created");

    Ok(created(
        format!("/api/v1/tasks/{}", task.id),
        Json(ApiResponse::success(
            "Task created successfully",
            TaskResponse::from(task),
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/tasks/{id}",
    tag = "tasks",
    params(("id" = String, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task found", body = ApiResponse<TaskResponse>),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<TaskResponse>>> {
    let task = state
        .with_deadline(state.store().tasks.get_by_id(&id))
        .await?;

    Ok(Json(ApiResponse::success(
        "Task retrieved successfully",
        TaskResponse::from(task),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/tasks",
    tag = "tasks",
    params(UserIdQuery),
    responses(
        (status = 200, description = "Tasks owned by the user, oldest first", body = ApiResponse<Vec<TaskResponse>>),
        (status = 400, description = "Missing userId parameter", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> AppResult<Json<ApiResponse<Vec<TaskResponse>>>> {
    let user_id = query.require()?;
    let tasks = state
        .with_deadline(state.store().tasks.get_all_for_user(&user_id))
        .await?;

    Ok(Json(ApiResponse::success(
        "Tasks retrieved successfully",
        tasks.into_iter().map(TaskResponse::from).collect(),
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/tasks/{id}",
    tag = "tasks",
    params(("id" = String, Path, description = "Task ID")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = ApiResponse<TaskResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, body))]
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<TaskResponse>>> {
    let Json(req) = body?;
    let (priority, status) = req.parse()?;

    let tasks = &state.store().tasks;
    let task = state
        .with_deadline(async {
            let mut task = tasks.get_by_id(&id).await?;
            req.apply_to(priority, status, &mut task);
            tasks.update(&task).await?;
            tasks.get_by_id(&id).await
        })
        .await?;
    info!(task_id = %task.id, status = %task.status, "Task updated");

    Ok(Json(ApiResponse::success(
        "Task updated successfully",
        TaskResponse::from(task),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/tasks/{id}",
    tag = "tasks",
    params(("id" = String, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task deleted"),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .with_deadline(state.store().tasks.delete(&id))
        .await?;
    info!(task_id = %id, "Task deleted");

    Ok(Json(ApiResponse::message("Task deleted successfully")))
}
