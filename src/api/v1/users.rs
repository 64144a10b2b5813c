//! User account handlers.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};

use crate::api::{ApiResponse, AppState, ErrorResponse};
use crate::db::{User, UserRepository};
use crate::error::{AppError, AppResult};

use super::{Created, created, required};

// =============================================================================
// DTOs
// =============================================================================

/// A user as rendered by the API. The password hash is never included.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "6f1c1c2e-4b7e-4a8e-9d8e-2f1f5b0c9a11")]
    pub id: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Pre-computed password hash, stored as given
    pub password_hash: String,
    #[serde(default)]
    #[schema(example = "Ada")]
    pub first_name: String,
    #[serde(default)]
    #[schema(example = "Lovelace")]
    pub last_name: String,
}

/// Full replacement of a user's profile. Omitting `password_hash` keeps the
/// stored one.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password_hash: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl UpdateUserRequest {
    fn apply_to(self, target: &mut User) {
        target.email = self.email;
        target.first_name = self.first_name;
        target.last_name = self.last_name;
        if let Some(hash) = self.password_hash.filter(|h| !h.trim().is_empty()) {
            target.password_hash = hash;
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct EmailQuery {
    /// Email address to look up
    #[param(example = "ada@example.com")]
    pub email: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, body))]
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> AppResult<Created<Json<ApiResponse<UserResponse>>>> {
    let Json(req) = body?;
    required("email", &req.email)?;
    required("password_hash", &req.password_hash)?;

    let user = User {
        email: req.email,
        password_hash: req.password_hash,
        first_name: req.first_name,
        last_name: req.last_name,
        ..Default::default()
    };
    let user = state
        .with_deadline(state.store().users.create(&user))
        .await?;
    info!(user_id = %user.id, "User created");

    Ok(created(
        format!("/api/v1/users/{}", user.id),
        Json(ApiResponse::success(
            "User created successfully",
            UserResponse::from(user),
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state
        .with_deadline(state.store().users.get_by_id(&id))
        .await?;

    Ok(Json(ApiResponse::success(
        "User retrieved successfully",
        UserResponse::from(user),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    params(EmailQuery),
    responses(
        (status = 200, description = "User found", body = ApiResponse<UserResponse>),
        (status = 400, description = "Missing email parameter", body = ErrorResponse),
        (status = 404, description = "No user with that email", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn find_user_by_email(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let email = query
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("Email parameter is required").with_details("email"))?;

    let user = state
        .with_deadline(state.store().users.get_by_email(&email))
        .await?;

    Ok(Json(ApiResponse::success(
        "User retrieved successfully",
        UserResponse::from(user),
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, body))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let Json(req) = body?;
    required("email", &req.email)?;

    let users = &state.store().users;
    let user = state
        .with_deadline(async {
            let mut user = users.get_by_id(&id).await?;
            req.apply_to(&mut user);
            users.update(&user).await?;
            users.get_by_id(&id).await
        })
        .await?;
    info!(user_id = %user.id, "User updated");

    Ok(Json(ApiResponse::success(
        "User updated successfully",
        UserResponse::from(user),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted, with their tasks and categories"),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .with_deadline(state.store().users.delete(&id))
        .await?;
    info!(user_id = %id, "User deleted");

    Ok(Json(ApiResponse::message("User deleted successfully")))
}
