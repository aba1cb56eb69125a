//! # Category Repository
//!
//! Database operations for product categories.

use sqlx::SqlitePool;
use tracing::debug;

use kasir_core::{Category, CategoryId, CategoryInput};

use crate::error::{DbError, DbResult};

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists every category ordered by id.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Gets a category by its ID.
    pub async fn get_by_id(&self, id: CategoryId) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Inserts a new category and returns it with its assigned id.
    pub async fn insert(&self, input: &CategoryInput) -> DbResult<Category> {
        debug!(name = %input.name, "Inserting category");

        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, description) VALUES (?1, ?2) \
             RETURNING id, name, description",
        )
        .bind(&input.name)
        .bind(&input.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    /// Replaces name and description of an existing category.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Category doesn't exist
    pub async fn update(&self, id: CategoryId, input: &CategoryInput) -> DbResult<Category> {
        debug!(id = id, "Updating category");

        let result = sqlx::query("UPDATE categories SET name = ?2, description = ?3 WHERE id = ?1")
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(input.clone().into_category(id))
    }

    /// Deletes a category; `ON DELETE SET NULL` uncategorizes its products.
    pub async fn delete(&self, id: CategoryId) -> DbResult<()> {
        debug!(id = id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }

    /// Counts categories (for seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn makanan() -> CategoryInput {
        CategoryInput {
            name: "Makanan".to_string(),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn test_category_crud() {
        let repo = Database::new(DbConfig::in_memory()).await.unwrap().categories();

        let created = repo.insert(&makanan()).await.unwrap();
        assert_eq!(repo.get_by_id(created.id).await.unwrap(), Some(created.clone()));

        let updated = repo
            .update(
                created.id,
                &CategoryInput {
                    name: "Makanan Berat".to_string(),
                    description: "Nasi dan mie".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(repo.list().await.unwrap(), vec![updated]);

        repo.delete(created.id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_category_is_not_found() {
        let repo = Database::new(DbConfig::in_memory()).await.unwrap().categories();

        assert!(matches!(
            repo.update(3, &makanan()).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
        assert!(matches!(repo.delete(3).await.unwrap_err(), DbError::NotFound { .. }));
    }
}
