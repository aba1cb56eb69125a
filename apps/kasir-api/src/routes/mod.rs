//! # HTTP Routes
//!
//! ```text
//! GET    /                          welcome + status
//! GET    /health                    storage reachability (200 | 503)
//! POST   /api/checkout              price and commit a transaction
//! GET    /api/report/hari-ini       today's sales
//! GET    /api/report                ?start_date=YYYY-MM-DD&end_date=YYYY-MM-DD
//! GET    /api/produk                list products
//! POST   /api/produk                create product
//! GET    /api/produk/{id}           get product
//! PUT    /api/produk/{id}           replace product
//! DELETE /api/produk/{id}           delete product
//! *      /api/categories[/{id}]     same shape for categories
//! ```

pub mod category;
pub mod checkout;
pub mod health;
pub mod product;
pub mod report;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;

use crate::state::AppState;

/// Body for operations that only report success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/api/checkout", post(checkout::checkout))
        .route("/api/report/hari-ini", get(report::daily))
        .route("/api/report", get(report::range))
        .route("/api/produk", get(product::list).post(product::create))
        .route(
            "/api/produk/{id}",
            get(product::get).put(product::update).delete(product::delete),
        )
        .route("/api/categories", get(category::list).post(category::create))
        .route(
            "/api/categories/{id}",
            get(category::get)
                .put(category::update)
                .delete(category::delete),
        )
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use kasir_db::Backend;

    use crate::state::AppState;

    /// Memory-backed state with the demo catalog (ids 1 and 2).
    pub fn memory_state(decrement_stock: bool) -> Arc<AppState> {
        Arc::new(AppState::from_backend(Backend::memory(decrement_stock)))
    }
}
