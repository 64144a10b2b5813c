//! Category handlers.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::api::{ApiResponse, AppState, ErrorResponse};
use crate::db::{Category, CategoryRepository};
use crate::error::{AppError, AppResult};

use super::{Created, UserIdQuery, created, required};

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: String,
    pub user_id: String,
    #[schema(example = "Work")]
    pub name: String,
    #[schema(example = "#3366ff")]
    pub color: String,
    pub created_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            user_id: c.user_id,
            name: c.name,
            color: c.color,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub user_id: String,
    #[schema(example = "Work")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "#3366ff")]
    pub color: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    #[schema(example = "Personal")]
    pub name: String,
    #[serde(default)]
    pub color: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/categories",
    tag = "categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Database error, including unknown user", body = ErrorResponse)
    )
)]
#[instrument(skip(state, body))]
pub async fn create_category(
    State(state): State<AppState>,
    body: Result<Json<CreateCategoryRequest>, JsonRejection>,
) -> AppResult<Created<Json<ApiResponse<CategoryResponse>>>> {
    let Json(req) = body?;
    required("user_id", &req.user_id)?;
    required("name", &req.name)?;

    let category = Category {
        user_id: req.user_id,
        name: req.name,
        color: req.color,
        ..Default::default()
    };
    let category = state
        .with_deadline(state.store().categories.create(&category))
        .await?;
    info!(category_id = %category.id, "Category created");

    Ok(created(
        format!("/api/v1/categories/{}", category.id),
        Json(ApiResponse::success(
            "Category created successfully",
            CategoryResponse::from(category),
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}",
    tag = "categories",
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryResponse>),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<CategoryResponse>>> {
    let category = state
        .with_deadline(state.store().categories.get_by_id(&id))
        .await?;

    Ok(Json(ApiResponse::success(
        "Category retrieved successfully",
        CategoryResponse::from(category),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories",
    tag = "categories",
    params(UserIdQuery),
    responses(
        (status = 200, description = "Categories owned by the user", body = ApiResponse<Vec<CategoryResponse>>),
        (status = 400, description = "Missing userId parameter", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> AppResult<Json<ApiResponse<Vec<CategoryResponse>>>> {
    let user_id = query.require()?;
    let categories = state
        .with_deadline(state.store().categories.get_all_for_user(&user_id))
        .await?;

    Ok(Json(ApiResponse::success(
        "Categories retrieved successfully",
        categories.into_iter().map(CategoryResponse::from).collect(),
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/categories/{id}",
    tag = "categories",
    params(("id" = String, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, body))]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateCategoryRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<CategoryResponse>>> {
    let Json(req) = body?;
    required("name", &req.name)?;

    let categories = &state.store().categories;
    let category = state
        .with_deadline(async {
            let mut category = categories.get_by_id(&id).await?;
            category.name = req.name;
            category.color = req.color;
            categories.update(&category).await?;
            Ok::<_, AppError>(category)
        })
        .await?;

    Ok(Json(ApiResponse::success(
        "Category updated successfully",
        CategoryResponse::from(category),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    tag = "categories",
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted; its tasks become uncategorized"),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .with_deadline(state.store().categories.delete(&id))
        .await?;
    info!(category_id = %id, "Category deleted");

    Ok(Json(ApiResponse::message("Category deleted successfully")))
}
