//! SQLite CategoryRepository implementation.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};
use tracing::{debug, info, instrument};

use super::helpers::{ensure_rows_affected, finish, scan_many, scan_one};
use crate::db::utils::generate_entity_id;
use crate::db::{Category, CategoryRepository, ErrorClassifier};
use crate::error::AppResult;

macro_rules! category_columns {
    () => {
        "id, user_id, name, color, created_at"
    };
}

const INSERT_CATEGORY: &str = "INSERT INTO categories (id, user_id, name, color) VALUES (?, ?, ?, ?)";
const SELECT_CATEGORY_BY_ID: &str =
    concat!("SELECT ", category_columns!(), " FROM categories WHERE id = ?");
const SELECT_CATEGORIES_FOR_USER: &str = concat!(
    "SELECT ",
    category_columns!(),
    " FROM categories WHERE user_id = ? ORDER BY created_at, rowid"
);
const UPDATE_CATEGORY: &str = "UPDATE categories SET user_id = ?, name = ?, color = ? WHERE id = ?";
const DELETE_CATEGORY: &str = "DELETE FROM categories WHERE id = ?";

/// SQLx-backed category repository.
#[derive(Clone)]
pub struct SqliteCategoryRepository {
    pool: SqlitePool,
    classifier: ErrorClassifier,
}

impl SqliteCategoryRepository {
    pub fn new(pool: SqlitePool, classifier: ErrorClassifier) -> Self {
        Self { pool, classifier }
    }
}

impl<'r> FromRow<'r, SqliteRow> for Category {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Category {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            color: row.try_get("color")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl CategoryRepository for SqliteCategoryRepository {
    #[instrument(skip(self, category), fields(user_id = %category.user_id))]
    async fn create(&self, category: &Category) -> AppResult<Category> {
        const OP: &str = "CreateCategory";
        debug!("creating category");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| self.classifier.classify(OP, &category.user_id, e))?;

        let id = generate_entity_id();

        let outcome = async {
            sqlx::query(INSERT_CATEGORY)
                .bind(&id)
                .bind(&category.user_id)
                .bind(&category.name)
                .bind(&category.color)
                .execute(&mut *tx)
                .await?;

            scan_one::<Category, _>(&mut *tx, SELECT_CATEGORY_BY_ID, &id).await
        }
        .await
        .map_err(|e| self.classifier.classify(OP, &id, e));

        let created = finish(tx, outcome, &self.classifier, OP, &id).await?;

        info!(category_id = %created.id, "created category");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> AppResult<Category> {
        debug!("get category by id");

        let category = scan_one::<Category, _>(&self.pool, SELECT_CATEGORY_BY_ID, id)
            .await
            .map_err(|e| self.classifier.classify("GetCategoryByID", id, e))?;

        info!(category_id = %id, "got category");
        Ok(category)
    }

    #[instrument(skip(self))]
    async fn get_all_for_user(&self, user_id: &str) -> AppResult<Vec<Category>> {
        debug!("get all categories for user");

        let categories = scan_many::<Category, _>(&self.pool, SELECT_CATEGORIES_FOR_USER, user_id)
            .await
            .map_err(|e| self.classifier.classify("GetAllCategoriesForUser", user_id, e))?;

        info!(count = categories.len(), "got categories for user");
        Ok(categories)
    }

    #[instrument(skip(self, category), fields(category_id = %category.id))]
    async fn update(&self, category: &Category) -> AppResult<()> {
        const OP: &str = "UpdateCategory";
        debug!("update category");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| self.classifier.classify(OP, &category.id, e))?;

        let outcome = match sqlx::query(UPDATE_CATEGORY)
            .bind(&category.user_id)
            .bind(&category.name)
            .bind(&category.color)
            .bind(&category.id)
            .execute(&mut *tx)
            .await
        {
            Ok(result) => ensure_rows_affected(&result, &self.classifier, OP, &category.id),
            Err(e) => Err(self.classifier.classify(OP, &category.id, e)),
        };

        finish(tx, outcome, &self.classifier, OP, &category.id).await?;

        info!("updated category");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> AppResult<()> {
        const OP: &str = "DeleteCategory";
        debug!("delete category");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| self.classifier.classify(OP, id, e))?;

        let outcome = match sqlx::query(DELETE_CATEGORY).bind(id).execute(&mut *tx).await {
            Ok(result) => ensure_rows_affected(&result, &self.classifier, OP, id),
            Err(e) => Err(self.classifier.classify(OP, id, e)),
        };

        finish(tx, outcome, &self.classifier, OP, id).await?;

        info!(category_id = %id, "deleted category");
        Ok(())
    }
}
