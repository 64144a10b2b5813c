//! API route configuration.

use axum::Router;
use axum::routing::get;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use super::state::AppState;
use super::v1::{
    self, CategoryResponse, CreateCategoryRequest, CreateTaskRequest, CreateUserRequest,
    HealthResponse, TaskResponse, UpdateCategoryRequest, UpdateTaskRequest, UpdateUserRequest,
    UserResponse,
};
use super::{ErrorInfo, ErrorResponse};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Task Store API",
        version = "0.3.0",
        description = "Users, tasks, and categories over a transactional SQLite store",
        license(name = "GPL-2.0")
    ),
    paths(
        v1::health,
        v1::create_user,
        v1::get_user,
        v1::find_user_by_email,
        v1::update_user,
        v1::delete_user,
        v1::create_task,
        v1::get_task,
        v1::list_tasks,
        v1::update_task,
        v1::delete_task,
        v1::create_category,
        v1::get_category,
        v1::list_categories,
        v1::update_category,
        v1::delete_category,
    ),
    components(
        schemas(
            HealthResponse,
            UserResponse,
            CreateUserRequest,
            UpdateUserRequest,
            TaskResponse,
            CreateTaskRequest,
            UpdateTaskRequest,
            CategoryResponse,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            ErrorInfo,
            ErrorResponse,
        )
    ),
    tags(
        (name = "system", description = "System health endpoints"),
        (name = "users", description = "User account endpoints"),
        (name = "tasks", description = "Task management endpoints"),
        (name = "categories", description = "Category management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the API router with OpenAPI documentation
pub fn create_router(state: AppState) -> Router {
    let api = ApiDoc::openapi();

    let user_routes = Router::new()
        .route("/users", get(v1::find_user_by_email).post(v1::create_user))
        .route(
            "/users/{id}",
            get(v1::get_user)
                .put(v1::update_user)
                .delete(v1::delete_user),
        );

    let task_routes = Router::new()
        .route("/tasks", get(v1::list_tasks).post(v1::create_task))
        .route(
            "/tasks/{id}",
            get(v1::get_task)
                .put(v1::update_task)
                .delete(v1::delete_task),
        );

    let category_routes = Router::new()
        .route(
            "/categories",
            get(v1::list_categories).post(v1::create_category),
        )
        .route(
            "/categories/{id}",
            get(v1::get_category)
                .put(v1::update_category)
                .delete(v1::delete_category),
        );

    let v1_routes = user_routes.merge(task_routes).merge(category_routes);

    Router::new()
        .route("/health", get(v1::health))
        .nest("/api/v1", v1_routes)
        .merge(Scalar::with_url("/docs", api))
        .with_state(state)
}
