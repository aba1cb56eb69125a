//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Point lookup for checkout pricing (implements [`ProductLookup`])
//! - CRUD for the catalog routes
//!
//! A product's `stock` is only ever written here by an explicit update, or
//! by the transaction repository when stock decrement is enabled.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use kasir_core::{Product, ProductId, ProductInput, ProductLookup, StoreResult};

use crate::error::{DbError, DbResult};

const PRODUCT_COLUMNS: &str = "id, name, price, stock, category_id";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let product = repo.get_by_id(1).await?;
/// let all = repo.list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product ordered by id.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: ProductId) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product and returns it with its assigned id.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - `category_id` doesn't exist
    pub async fn insert(&self, input: &ProductInput) -> DbResult<Product> {
        debug!(name = %input.name, "Inserting product");

        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (name, price, stock, category_id) \
             VALUES (?1, ?2, ?3, ?4) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(input.price)
        .bind(input.stock)
        .bind(input.category_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    /// Replaces every field of an existing product.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, id: ProductId, input: &ProductInput) -> DbResult<Product> {
        debug!(id = id, "Updating product");

        let result = sqlx::query(
            "UPDATE products SET name = ?2, price = ?3, stock = ?4, category_id = ?5 \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.price)
        .bind(input.stock)
        .bind(input.category_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(input.clone().into_product(id))
    }

    /// Deletes a product. Past transaction details keep their snapshot.
    pub async fn delete(&self, id: ProductId) -> DbResult<()> {
        debug!(id = id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts total products (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl ProductLookup for ProductRepository {
    async fn get_by_id(&self, id: ProductId) -> StoreResult<Option<Product>> {
        Ok(ProductRepository::get_by_id(self, id).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
