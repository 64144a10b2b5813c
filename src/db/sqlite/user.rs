//! SQLite UserRepository implementation.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};
use tracing::{debug, info, instrument};

use super::helpers::{ensure_rows_affected, finish, scan_one};
use crate::db::utils::generate_entity_id;
use crate::db::{ErrorClassifier, User, UserRepository};
use crate::error::AppResult;

macro_rules! user_columns {
    () => {
        "id, email, password_hash, first_name, last_name, created_at, updated_at"
    };
}

const INSERT_USER: &str =
    "INSERT INTO users (id, email, password_hash, first_name, last_name) VALUES (?, ?, ?, ?, ?)";
const SELECT_USER_BY_ID: &str = concat!("SELECT ", user_columns!(), " FROM users WHERE id = ?");
const SELECT_USER_BY_EMAIL: &str =
    concat!("SELECT ", user_columns!(), " FROM users WHERE email = ?");
const UPDATE_USER: &str = "UPDATE users SET email = ?, password_hash = ?, first_name = ?, last_name = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?";
const DELETE_USER: &str = "DELETE FROM users WHERE id = ?";

/// SQLx-backed user repository.
#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
    classifier: ErrorClassifier,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool, classifier: ErrorClassifier) -> Self {
        Self { pool, classifier }
    }
}

impl<'r> FromRow<'r, SqliteRow> for User {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(User {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl UserRepository for SqliteUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create(&self, user: &User) -> AppResult<User> {
        const OP: &str = "CreateUser";
        debug!("creating user");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| self.classifier.classify(OP, &user.email, e))?;

        let id = generate_entity_id();

        let outcome = async {
            sqlx::query(INSERT_USER)
                .bind(&id)
                .bind(&user.email)
                .bind(&user.password_hash)
                .bind(&user.first_name)
                .bind(&user.last_name)
                .execute(&mut *tx)
                .await?;

            scan_one::<User, _>(&mut *tx, SELECT_USER_BY_ID, &id).await
        }
        .await
        .map_err(|e| self.classifier.classify(OP, &id, e));

        let created = finish(tx, outcome, &self.classifier, OP, &id).await?;

        info!(user_id = %created.id, "created user");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> AppResult<User> {
        debug!("get user by id");

        let user = scan_one::<User, _>(&self.pool, SELECT_USER_BY_ID, id)
            .await
            .map_err(|e| self.classifier.classify("GetUserByID", id, e))?;

        info!(user_id = %id, "got user");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn get_by_email(&self, email: &str) -> AppResult<User> {
        debug!("get user by email");

        let user = scan_one::<User, _>(&self.pool, SELECT_USER_BY_EMAIL, email)
            .await
            .map_err(|e| self.classifier.classify("GetUserByEmail", email, e))?;

        info!(user_id = %user.id, "got user by email");
        Ok(user)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update(&self, user: &User) -> AppResult<()> {
        const OP: &str = "UpdateUser";
        debug!("update user");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| self.classifier.classify(OP, &user.id, e))?;

        let outcome = match sqlx::query(UPDATE_USER)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.id)
            .execute(&mut *tx)
            .await
        {
            Ok(result) => ensure_rows_affected(&result, &self.classifier, OP, &user.id),
            Err(e) => Err(self.classifier.classify(OP, &user.id, e)),
        };

        finish(tx, outcome, &self.classifier, OP, &user.id).await?;

        info!("updated user");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> AppResult<()> {
        const OP: &str = "DeleteUser";
        debug!("delete user");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| self.classifier.classify(OP, id, e))?;

        let outcome = match sqlx::query(DELETE_USER).bind(id).execute(&mut *tx).await {
            Ok(result) => ensure_rows_affected(&result, &self.classifier, OP, id),
            Err(e) => Err(self.classifier.classify(OP, id, e)),
        };

        finish(tx, outcome, &self.classifier, OP, id).await?;

        info!(user_id = %id, "deleted user");
        Ok(())
    }
}
