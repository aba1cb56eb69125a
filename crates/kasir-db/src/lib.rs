//! # kasir-db: Storage Layer for Kasir POS
//!
//! This crate implements the kasir-core storage ports twice: over SQLite
//! with sqlx, and over in-process maps.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kasir POS Data Flow                              │
//! │                                                                         │
//! │  POST /api/checkout  →  CheckoutEngine (kasir-core)                    │
//! │       │                                                                 │
//! │       ▼  Arc<dyn ProductLookup / TransactionStore / CatalogStore>      │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     kasir-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ Product       │    │  (embedded)  │  │   │
//! │  │   │  SqlitePool   │    │ Category      │    │ 001_init.sql │  │   │
//! │  │   │               │    │ Transaction   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐                                             │   │
//! │  │   │ MemoryBackend │  RwLock'd maps, demo catalog                │   │
//! │  │   └───────────────┘                                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - SQLite repositories
//! - [`memory`] - In-memory backend
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kasir_db::{Backend, DbConfig};
//!
//! let backend = Backend::sqlite(DbConfig::new("kasir.db")).await?;
//! let engine = CheckoutEngine::new(backend.products.clone(), backend.transactions.clone());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repository;

use std::sync::Arc;

use kasir_core::{CatalogStore, ProductLookup, TransactionStore};

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use memory::MemoryBackend;
pub use pool::{Database, DbConfig};

pub use repository::category::CategoryRepository;
pub use repository::product::ProductRepository;
pub use repository::transaction::TransactionRepository;

// =============================================================================
// Backend Selection
// =============================================================================

/// The three storage ports, backed by one store chosen at startup.
#[derive(Clone)]
pub struct Backend {
    pub products: Arc<dyn ProductLookup>,
    pub transactions: Arc<dyn TransactionStore>,
    pub catalog: Arc<dyn CatalogStore>,
}

impl Backend {
    /// In-process storage preloaded with the demo catalog.
    pub fn memory(decrement_stock: bool) -> Self {
        let store = Arc::new(MemoryBackend::with_demo_catalog(decrement_stock));
        Backend {
            products: store.clone(),
            transactions: store.clone(),
            catalog: store,
        }
    }

    /// SQLite storage; opens the pool and runs migrations.
    pub async fn sqlite(config: DbConfig) -> DbResult<Self> {
        let db = Database::new(config).await?;
        Ok(Backend {
            products: Arc::new(db.products()),
            transactions: Arc::new(db.transactions()),
            catalog: Arc::new(db),
        })
    }
}
