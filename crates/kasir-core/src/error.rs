//! # Error Types
//!
//! Domain-specific error types for kasir-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kasir-core errors (this file)                                         │
//! │  ├── CoreError        - Checkout / report failures                     │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── StoreError       - What a storage port reports back               │
//! │                                                                         │
//! │  kasir-db errors (separate crate)                                      │
//! │  └── DbError          - sqlx failures, converted into StoreError       │
//! │                                                                         │
//! │  kasir-api errors (in app)                                             │
//! │  └── ApiError         - What HTTP clients see (serialized)             │
//! │                                                                         │
//! │  Flow: DbError → StoreError → CoreError → ApiError → Client            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use thiserror::Error;

use crate::types::ProductId;

// =============================================================================
// Core Error
// =============================================================================

/// Failures of the checkout engine and report aggregator.
///
/// Every variant reaches the caller verbatim; nothing is retried here.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A checkout line references a product the catalog does not have.
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: ProductId },

    /// Requested quantity exceeds stock on hand.
    ///
    /// ## User Workflow
    /// ```text
    /// Checkout [{ product_id: 1, quantity: 25 }]
    ///      │
    ///      ▼
    /// Lookup: Indomie Bangladesh, stock = 20
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: 1, requested: 25, available: 20 }
    ///      │
    ///      ▼
    /// Nothing is committed
    /// ```
    #[error(
        "Insufficient stock for {product_name} (id {product_id}): available {available}, requested {requested}"
    )]
    InsufficientStock {
        product_id: ProductId,
        product_name: String,
        requested: i64,
        available: i64,
    },

    /// Report range whose start date is after its end date.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// Any failure reported by a storage port.
    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Arithmetic on an amount left the representable range.
    #[error("{field} is too large")]
    Overflow { field: String },
}

// =============================================================================
// Store Error
// =============================================================================

/// Errors reported by storage backends through the port traits.
///
/// Backends map their own error types into these variants so the core can
/// stay independent of any driver.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Entity not found (update/delete of a missing id).
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Stock-enforcing commit found too little stock at write time.
    #[error("Stock changed for product {product_id}: requested {requested}, available {available}")]
    StockConflict {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// A storage constraint rejected the write (unique, foreign key, check).
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// The backend cannot be reached (pool closed, exhausted, I/O).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Internal storage error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type returned by storage ports.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product_id: 1,
            product_name: "Indomie Bangladesh".to_string(),
            requested: 25,
            available: 20,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Indomie Bangladesh (id 1): available 20, requested 25"
        );

        let err = CoreError::ProductNotFound { product_id: 42 };
        assert_eq!(err.to_string(), "Product not found: 42");
    }

    #[test]
    fn test_invalid_range_message() {
        let err = CoreError::InvalidRange {
            start: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid date range: start 2026-02-10 is after end 2026-02-01"
        );
    }

    #[test]
    fn test_store_error_converts_to_persistence() {
        let core_err: CoreError = StoreError::Unavailable("pool closed".to_string()).into();
        assert!(matches!(core_err, CoreError::Persistence(StoreError::Unavailable(_))));
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(
            core_err.to_string(),
            "Validation error: quantity must be positive"
        );
    }
}
