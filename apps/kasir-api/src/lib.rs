//! # kasir-api
//!
//! HTTP server for Kasir POS.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          kasir-api                                      │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  checkout      │  │  report        │  │  product / category        ││
//! │  │ POST /api/     │  │ GET /api/      │  │ GET/POST/PUT/DELETE        ││
//! │  │   checkout     │  │   report[...]  │  │   /api/produk[/{id}]       ││
//! │  └───────┬────────┘  └───────┬────────┘  └─────────────┬──────────────┘│
//! │          ▼                   ▼                         ▼               │
//! │    CheckoutEngine     ReportAggregator           CatalogStore          │
//! │          └───────────────────┴─────────────────────────┘               │
//! │                              ▼                                          │
//! │                  kasir-db Backend (memory | sqlite)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config`]. Environment variables:
//! - `KASIR_CONFIG` - TOML config file path
//! - `KASIR_BIND_ADDR` / `KASIR_PORT` - listen address (default 0.0.0.0:8081)
//! - `KASIR_STORAGE_BACKEND` - `memory` (default) or `sqlite`
//! - `KASIR_DB_PATH` - SQLite file
//! - `KASIR_DECREMENT_STOCK` - take sold quantities off stock
//! - `RUST_LOG` - log filter (default `info,kasir=debug,sqlx=warn`)

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use tracing_subscriber::EnvFilter;

// Re-exports
pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ErrorCode};
pub use routes::router;
pub use state::AppState;

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kasir=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
