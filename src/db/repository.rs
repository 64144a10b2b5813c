//! Repository traits for data access abstraction.
//!
//! Every repository has the same shape: create with read-back, lookup by
//! identity, a per-owner (or per-email) query, full-row update and hard
//! delete. All failures are returned already classified.

use std::future::Future;

use crate::db::models::{Category, Task, User};
use crate::error::AppResult;

/// Repository for User operations.
pub trait UserRepository {
    /// Insert a new user and return the stored row. Identity and
    /// timestamps on the input are ignored.
    fn create(&self, user: &User) -> impl Future<Output = AppResult<User>> + Send;

    /// Get a user by ID.
    fn get_by_id(&self, id: &str) -> impl Future<Output = AppResult<User>> + Send;

    /// Get a user by email. Missing users are `NotFound`.
    fn get_by_email(&self, email: &str) -> impl Future<Output = AppResult<User>> + Send;

    /// Replace all mutable columns of an existing user.
    fn update(&self, user: &User) -> impl Future<Output = AppResult<()>> + Send;

    /// Delete a user by ID.
    fn delete(&self, id: &str) -> impl Future<Output = AppResult<()>> + Send;
}

/// Repository for Task operations.
pub trait TaskRepository {
    /// Insert a new task and return the stored row.
    fn create(&self, task: &Task) -> impl Future<Output = AppResult<Task>> + Send;

    /// Get a task by ID.
    fn get_by_id(&self, id: &str) -> impl Future<Output = AppResult<Task>> + Send;

    /// Get all tasks owned by a user. Empty when the user has none.
    fn get_all_for_user(&self, user_id: &str) -> impl Future<Output = AppResult<Vec<Task>>> + Send;

    /// Replace all mutable columns of an existing task.
    fn update(&self, task: &Task) -> impl Future<Output = AppResult<()>> + Send;

    /// Delete a task by ID.
    fn delete(&self, id: &str) -> impl Future<Output = AppResult<()>> + Send;
}

/// Repository for Category operations.
pub trait CategoryRepository {
    /// Insert a new category and return the stored row.
    fn create(&self, category: &Category) -> impl Future<Output = AppResult<Category>> + Send;

    /// Get a category by ID.
    fn get_by_id(&self, id: &str) -> impl Future<Output = AppResult<Category>> + Send;

    /// Get all categories owned by a user. Empty when the user has none.
    fn get_all_for_user(
        &self,
        user_id: &str,
    ) -> impl Future<Output = AppResult<Vec<Category>>> + Send;

    /// Replace all mutable columns of an existing category.
    fn update(&self, category: &Category) -> impl Future<Output = AppResult<()>> + Send;

    /// Delete a category by ID.
    fn delete(&self, id: &str) -> impl Future<Output = AppResult<()>> + Send;
}
