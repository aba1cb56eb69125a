//! # Application State
//!
//! Everything a handler can reach, built once at startup.
//!
//! ```text
//! ServerConfig ──► Backend (memory | sqlite)
//!                     │
//!                     ├── products      ──► CheckoutEngine
//!                     ├── transactions  ──► CheckoutEngine, ReportAggregator, /health
//!                     └── catalog       ──► /api/produk, /api/categories
//! ```

use std::sync::Arc;

use tracing::info;

use kasir_core::{CatalogStore, CheckoutEngine, ReportAggregator, TransactionStore};
use kasir_db::{Backend, DbConfig, DbResult};

use crate::config::{ServerConfig, StorageBackend};

/// Shared application state.
pub struct AppState {
    pub checkout: CheckoutEngine,
    pub reports: ReportAggregator,
    pub catalog: Arc<dyn CatalogStore>,
    pub transactions: Arc<dyn TransactionStore>,
}

impl AppState {
    /// Wires the engine and aggregator to one backend.
    pub fn from_backend(backend: Backend) -> Self {
        AppState {
            checkout: CheckoutEngine::new(backend.products, backend.transactions.clone()),
            reports: ReportAggregator::new(backend.transactions.clone()),
            catalog: backend.catalog,
            transactions: backend.transactions,
        }
    }

    /// Opens the configured backend.
    pub async fn build(config: &ServerConfig) -> DbResult<Arc<Self>> {
        let decrement = config.stock.decrement_on_checkout;

        let backend = match config.storage.backend {
            StorageBackend::Memory => {
                info!(decrement_stock = decrement, "Using in-memory storage");
                Backend::memory(decrement)
            }
            StorageBackend::Sqlite => {
                let path = config.database_path();
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        kasir_db::DbError::ConnectionFailed(format!(
                            "cannot create {}: {}",
                            parent.display(),
                            e
                        ))
                    })?;
                }
                info!(path = %path.display(), decrement_stock = decrement, "Using SQLite storage");

                let db_config = DbConfig::new(path)
                    .max_connections(config.storage.max_connections)
                    .min_connections(1)
                    .decrement_stock(decrement);
                Backend::sqlite(db_config).await?
            }
        };

        Ok(Arc::new(AppState::from_backend(backend)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_memory_state_has_demo_catalog() {
        let state = AppState::build(&ServerConfig::default()).await.unwrap();

        let products = state.catalog.list_products().await.unwrap();
        assert_eq!(products.len(), 2);
        state.transactions.ping().await.unwrap();
    }
}
