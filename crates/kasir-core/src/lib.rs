//! # kasir-core: Checkout and Reporting Logic for Kasir POS
//!
//! This crate is the **heart** of Kasir POS. It prices and validates
//! checkouts and shapes sales reports, reaching storage only through
//! port traits.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kasir POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (kasir-api, axum)                   │   │
//! │  │    POST /api/checkout   GET /api/report   /api/produk ...       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kasir-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ checkout  │  │  report   │  │   types   │  │   money   │  │   │
//! │  │   │  Engine   │  │Aggregator │  │  Product  │  │   Money   │  │   │
//! │  │   └─────┬─────┘  └─────┬─────┘  └───────────┘  └───────────┘  │   │
//! │  │         └──────┬───────┘                                        │   │
//! │  │         ┌──────▼──────┐                                         │   │
//! │  │         │    ports    │  ProductLookup / TransactionStore       │   │
//! │  │         └──────┬──────┘                                         │   │
//! │  └────────────────┼────────────────────────────────────────────────┘   │
//! │                   │                                                     │
//! │  ┌────────────────▼────────────────────────────────────────────────┐   │
//! │  │          kasir-db (SQLite backend, in-memory backend)           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Transaction, SalesReport, ...)
//! - [`money`] - Money type with checked integer arithmetic
//! - [`error`] - Domain and port error types
//! - [`validation`] - Business rule validation
//! - [`ports`] - Storage capability traits
//! - [`checkout`] - The checkout engine
//! - [`report`] - Report windows and the report aggregator
//!
//! ## Example Usage
//!
//! ```rust
//! use kasir_core::money::Money;
//!
//! // 2 × Indomie + 5 × Teh Tarik
//! let total = Money::from_units(7500).checked_mul_quantity(2).unwrap()
//!     + Money::from_units(3000).checked_mul_quantity(5).unwrap();
//! assert_eq!(total.units(), 30000);
//! ```

pub mod checkout;
pub mod error;
pub mod money;
pub mod ports;
pub mod report;
pub mod types;
pub mod validation;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use checkout::CheckoutEngine;
pub use error::{CoreError, CoreResult, StoreError, StoreResult, ValidationError};
pub use money::Money;
pub use ports::{CatalogStore, ProductLookup, TransactionStore};
pub use report::{ReportAggregator, ReportWindow};
pub use types::*;
