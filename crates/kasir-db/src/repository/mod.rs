//! # Repository Module
//!
//! SQLite repository implementations for Kasir POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CheckoutEngine / ReportAggregator / catalog routes                    │
//! │       │  (through kasir-core port traits)                               │
//! │       ▼                                                                 │
//! │  ProductRepository      ── ProductLookup                               │
//! │  TransactionRepository  ── TransactionStore                            │
//! │  Database (product + category repos) ── CatalogStore                   │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD and lookup
//! - [`CategoryRepository`](category::CategoryRepository) - Category CRUD
//! - [`TransactionRepository`](transaction::TransactionRepository) - Atomic commits and reports

pub mod category;
pub mod product;
pub mod transaction;
