//! SQLite TaskRepository implementation.

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};
use tracing::{debug, info, instrument};

use super::helpers::{ensure_rows_affected, finish, scan_many, scan_one};
use crate::db::utils::generate_entity_id;
use crate::db::{ErrorClassifier, Task, TaskPriority, TaskRepository, TaskStatus};
use crate::error::AppResult;

macro_rules! task_columns {
    () => {
        "id, user_id, category_id, title, description, priority, status, due_date, completed_at, created_at, updated_at"
    };
}

const INSERT_TASK: &str = r#"
    INSERT INTO tasks (id, user_id, category_id, title, description, priority, status, due_date, completed_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;
const SELECT_TASK_BY_ID: &str = concat!("SELECT ", task_columns!(), " FROM tasks WHERE id = ?");
const SELECT_TASKS_FOR_USER: &str = concat!(
    "SELECT ",
    task_columns!(),
    " FROM tasks WHERE user_id = ? ORDER BY created_at, rowid"
);
const UPDATE_TASK: &str = r#"
    UPDATE tasks
    SET user_id = ?, category_id = ?, title = ?, description = ?, priority = ?, status = ?,
        due_date = ?, completed_at = ?, updated_at = CURRENT_TIMESTAMP
    WHERE id = ?
"#;
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?";

/// SQLx-backed task repository.
#[derive(Clone)]
pub struct SqliteTaskRepository {
    pool: SqlitePool,
    classifier: ErrorClassifier,
}

impl SqliteTaskRepository {
    pub fn new(pool: SqlitePool, classifier: ErrorClassifier) -> Self {
        Self { pool, classifier }
    }
}

impl<'r> FromRow<'r, SqliteRow> for Task {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let priority: String = row.try_get("priority")?;
        let status: String = row.try_get("status")?;

        Ok(Task {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            category_id: row.try_get("category_id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            priority: decode_enum::<TaskPriority>("priority", &priority)?,
            status: decode_enum::<TaskStatus>("status", &status)?,
            due_date: row.try_get("due_date")?,
            completed_at: row.try_get("completed_at")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Stored strings outside the enumerated set are decode failures, never defaults.
fn decode_enum<T>(column: &str, value: &str) -> Result<T, sqlx::Error>
where
    T: FromStr<Err = String>,
{
    T::from_str(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: e.into(),
    })
}

impl TaskRepository for SqliteTaskRepository {
    #[instrument(skip(self, task), fields(user_id = %task.user_id))]
    async fn create(&self, task: &Task) -> AppResult<Task> {
        const OP: &str = "CreateTask";
        debug!("creating task");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| self.classifier.classify(OP, &task.user_id, e))?;

        let id = generate_entity_id();

        let outcome = async {
            sqlx::query(INSERT_TASK)
                .bind(&id)
                .bind(&task.user_id)
                .bind(&task.category_id)
                .bind(&task.title)
                .bind(&task.description)
                .bind(task.priority.as_str())
                .bind(task.status.as_str())
                .bind(task.due_date)
                .bind(task.completed_at)
                .execute(&mut *tx)
                .await?;

            scan_one::<Task, _>(&mut *tx, SELECT_TASK_BY_ID, &id).await
        }
        .await
        .map_err(|e| self.classifier.classify(OP, &id, e));

        let created = finish(tx, outcome, &self.classifier, OP, &id).await?;

        info!(task_id = %created.id, "created task");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> AppResult<Task> {
        debug!("get task by id");

        let task = scan_one::<Task, _>(&self.pool, SELECT_TASK_BY_ID, id)
            .await
            .map_err(|e| self.classifier.classify("GetTaskByID", id, e))?;

        info!(task_id = %id, "got task");
        Ok(task)
    }

    #[instrument(skip(self))]
    async fn get_all_for_user(&self, user_id: &str) -> AppResult<Vec<Task>> {
        debug!("get all tasks for user");

        let tasks = scan_many::<Task, _>(&self.pool, SELECT_TASKS_FOR_USER, user_id)
            .await
            .map_err(|e| self.classifier.classify("GetAllTasksForUser", user_id, e))?;

        info!(count = tasks.len(), "got tasks for user");
        Ok(tasks)
    }

    #[instrument(skip(self, task), fields(task_id = %task.id))]
    async fn update(&self, task: &Task) -> AppResult<()> {
        const OP: &str = "UpdateTask";
        debug!("update task");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| self.classifier.classify(OP, &task.id, e))?;

        let outcome = match sqlx::query(UPDATE_TASK)
            .bind(&task.user_id)
            .bind(&task.category_id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.priority.as_str())
            .bind(task.status.as_str())
            .bind(task.due_date)
            .bind(task.completed_at)
            .bind(&task.id)
            .execute(&mut *tx)
            .await
        {
            Ok(result) => ensure_rows_affected(&result, &self.classifier, OP, &task.id),
            Err(e) => Err(self.classifier.classify(OP, &task.id, e)),
        };

        finish(tx, outcome, &self.classifier, OP, &task.id).await?;

        info!("updated task");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> AppResult<()> {
        const OP: &str = "DeleteTask";
        debug!("delete task");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| self.classifier.classify(OP, id, e))?;

        let outcome = match sqlx::query(DELETE_TASK).bind(id).execute(&mut *tx).await {
            Ok(result) => ensure_rows_affected(&result, &self.classifier, OP, id),
            Err(e) => Err(self.classifier.classify(OP, id, e)),
        };

        finish(tx, outcome, &self.classifier, OP, id).await?;

        info!(task_id = %id, "deleted task");
        Ok(())
    }
}
