//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  kasir-api startup (storage.backend = "sqlite")                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← Configure pool settings                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + run migrations            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │                           │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...   │  (max_connections)        │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       │ Concurrent access from HTTP handlers                           │
//! │       ▼                                                                 │
//! │  products() / categories() / transactions() repositories               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## SQLite Configuration
//!
//! We use WAL (Write-Ahead Logging) mode so report reads don't block a
//! checkout commit and vice versa.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use kasir_core::{
    CatalogStore, Category, CategoryId, CategoryInput, Product, ProductId, ProductInput,
    StoreResult,
};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::category::CategoryRepository;
use crate::repository::product::ProductRepository;
use crate::repository::transaction::TransactionRepository;

const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/kasir/kasir.db")
///     .max_connections(5)
///     .decrement_stock(true);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether a committed checkout takes its quantities off product stock.
    /// Default: false
    pub decrement_stock: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            decrement_stock: false,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets whether checkouts decrement stock.
    pub fn decrement_stock(mut self, enabled: bool) -> Self {
        self.decrement_stock = enabled;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// An in-memory SQLite database lives on a single connection, so the
    /// pool is pinned to one.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(3600),
            decrement_stock: false,
        }
    }

    fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Cloning is cheap: the pool is reference counted.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./kasir.db")).await?;
/// let product = db.products().get_by_id(1).await?;
/// let tx = db.transactions().create(new_transaction).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,

    decrement_stock: bool,
}

impl Database {
    /// Creates a new database connection pool.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite:
    ///    - WAL mode for concurrent reads
    ///    - NORMAL synchronous (balance of safety/speed)
    ///    - Foreign keys enabled
    /// 3. Creates the connection pool
    /// 4. Runs pending migrations
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_url = if config.is_in_memory() {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite://{}?mode=rwc", config.database_path.display())
        };

        let mut connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .synchronous(SqliteSynchronous::Normal)
            // SQLite has them disabled by default for backwards compatibility
            .foreign_keys(true)
            .create_if_missing(true);

        // WAL needs a real file
        if !config.is_in_memory() {
            connect_options = connect_options.journal_mode(SqliteJournalMode::Wal);
        }

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            decrement_stock = config.decrement_stock,
            "Database pool created"
        );

        let db = Database {
            pool,
            decrement_stock: config.decrement_stock,
        };

        db.run_migrations().await?;

        Ok(db)
    }

    /// Runs database migrations.
    ///
    /// Called by `new()` on every connect.
    async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the product repository.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    /// Returns the category repository.
    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone())
    }

    /// Returns the transaction repository.
    pub fn transactions(&self) -> TransactionRepository {
        TransactionRepository::new(self.pool.clone(), self.decrement_stock)
    }

    /// Closes the database connection pool.
    ///
    /// After calling close, all repository operations will fail.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }
}

/// Catalog CRUD over the product and category repositories.
#[async_trait]
impl CatalogStore for Database {
    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        Ok(self.products().list().await?)
    }

    async fn get_product(&self, id: ProductId) -> StoreResult<Option<Product>> {
        Ok(self.products().get_by_id(id).await?)
    }

    async fn create_product(&self, input: ProductInput) -> StoreResult<Product> {
        Ok(self.products().insert(&input).await?)
    }

    async fn update_product(&self, id: ProductId, input: ProductInput) -> StoreResult<Product> {
        Ok(self.products().update(id, &input).await?)
    }

    async fn delete_product(&self, id: ProductId) -> StoreResult<()> {
        Ok(self.products().delete(id).await?)
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        Ok(self.categories().list().await?)
    }

    async fn get_category(&self, id: CategoryId) -> StoreResult<Option<Category>> {
        Ok(self.categories().get_by_id(id).await?)
    }

    async fn create_category(&self, input: CategoryInput) -> StoreResult<Category> {
        Ok(self.categories().insert(&input).await?)
    }

    async fn update_category(
        &self,
        id: CategoryId,
        input: CategoryInput,
    ) -> StoreResult<Category> {
        Ok(self.categories().update(id, &input).await?)
    }

    async fn delete_category(&self, id: CategoryId) -> StoreResult<()> {
        Ok(self.categories().delete(id).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kasir_core::{Money, StoreError, TransactionStore};

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.transactions().ping().await.unwrap();

        let (total, applied) = migrations::migration_status(db.pool()).await.unwrap();
        assert_eq!(total, applied);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DbConfig::new("/tmp/kasir-test.db")
            .max_connections(10)
            .min_connections(2)
            .decrement_stock(true);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(config.decrement_stock);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }

    #[tokio::test]
    async fn test_catalog_store_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog: &dyn CatalogStore = &db;

        let minuman = catalog
            .create_category(CategoryInput {
                name: "Minuman".to_string(),
                description: "Minuman dingin".to_string(),
            })
            .await
            .unwrap();
        let teh = catalog
            .create_product(ProductInput {
                name: "Teh Tarik".to_string(),
                price: Money::from_units(3000),
                stock: 30,
                category_id: Some(minuman.id),
            })
            .await
            .unwrap();

        assert_eq!(catalog.get_product(teh.id).await.unwrap(), Some(teh.clone()));
        assert_eq!(catalog.list_categories().await.unwrap(), vec![minuman.clone()]);

        // Deleting the category leaves the product uncategorized
        catalog.delete_category(minuman.id).await.unwrap();
        let teh = catalog.get_product(teh.id).await.unwrap().unwrap();
        assert_eq!(teh.category_id, None);

        let err = catalog.delete_product(999).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
