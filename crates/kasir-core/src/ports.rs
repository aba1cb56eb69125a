//! # Storage Ports
//!
//! The capabilities the checkout engine and report aggregator consume.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CheckoutEngine ──► ProductLookup     get_by_id(id) → Product | None   │
//! │        │                                                                │
//! │        └──────────► TransactionStore  create_transaction(new) → Tx      │
//! │                                                                         │
//! │  ReportAggregator ─► TransactionStore sales_summary(window) → Report   │
//! │                                                                         │
//! │  HTTP catalog routes ─► CatalogStore  list/get/create/update/delete    │
//! │                                                                         │
//! │  Implementations (kasir-db):                                           │
//! │    SqliteBackend  - sqlx, one DB transaction per commit                │
//! │    MemoryBackend  - RwLock'd maps, one write guard per commit          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All traits are object safe so a backend can be chosen at startup and
//! shared as `Arc<dyn ...>`.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::report::ReportWindow;
use crate::types::{
    Category, CategoryId, CategoryInput, NewTransaction, Product, ProductId, ProductInput,
    SalesReport, Transaction,
};

/// Read access to current product price and stock.
#[async_trait]
pub trait ProductLookup: Send + Sync {
    /// Returns the product, or `None` when the id is unknown.
    async fn get_by_id(&self, id: ProductId) -> StoreResult<Option<Product>>;
}

/// Durable, atomic transaction persistence plus window aggregates.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Persists the header and every detail as one unit.
    ///
    /// The store assigns `id` and `created_at`. On error nothing is visible.
    async fn create_transaction(&self, transaction: NewTransaction) -> StoreResult<Transaction>;

    /// Sums totals, counts transactions and finds the best seller within
    /// the inclusive window. An empty window yields [`SalesReport::empty`].
    ///
    /// Ties on best-seller quantity go to the lowest product id.
    async fn sales_summary(&self, window: ReportWindow) -> StoreResult<SalesReport>;

    /// Cheap reachability check used by `/health`.
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Plain catalog CRUD.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_products(&self) -> StoreResult<Vec<Product>>;
    async fn get_product(&self, id: ProductId) -> StoreResult<Option<Product>>;
    async fn create_product(&self, input: ProductInput) -> StoreResult<Product>;
    /// Fails with `StoreError::NotFound` if the id does not exist.
    async fn update_product(&self, id: ProductId, input: ProductInput) -> StoreResult<Product>;
    /// Fails with `StoreError::NotFound` if the id does not exist.
    async fn delete_product(&self, id: ProductId) -> StoreResult<()>;

    async fn list_categories(&self) -> StoreResult<Vec<Category>>;
    async fn get_category(&self, id: CategoryId) -> StoreResult<Option<Category>>;
    async fn create_category(&self, input: CategoryInput) -> StoreResult<Category>;
    async fn update_category(&self, id: CategoryId, input: CategoryInput)
        -> StoreResult<Category>;
    /// Products in the category become uncategorized.
    async fn delete_category(&self, id: CategoryId) -> StoreResult<()>;
}
