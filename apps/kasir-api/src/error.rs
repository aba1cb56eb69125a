//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Kasir POS                              │
//! │                                                                         │
//! │  Handler → Result<T, ApiError>                                         │
//! │                                                                         │
//! │  CoreError::ProductNotFound    ──► 404 NOT_FOUND                       │
//! │  CoreError::InsufficientStock  ──► 409 INSUFFICIENT_STOCK              │
//! │  CoreError::InvalidRange       ──► 400 VALIDATION_ERROR                │
//! │  CoreError::Validation         ──► 400 VALIDATION_ERROR                │
//! │  CoreError::Persistence(e)     ──► per StoreError below                │
//! │                                                                         │
//! │  StoreError::NotFound          ──► 404 NOT_FOUND                       │
//! │  StoreError::StockConflict     ──► 409 INSUFFICIENT_STOCK              │
//! │  StoreError::Constraint        ──► 400 VALIDATION_ERROR                │
//! │  StoreError::Unavailable       ──► 500 DATABASE_ERROR (logged)         │
//! │  StoreError::Internal          ──► 500 DATABASE_ERROR (logged)         │
//! │                                                                         │
//! │  Bad JSON / query string       ──► 400 VALIDATION_ERROR                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Clients receive `{ "code": "NOT_FOUND", "message": "Product not found: 9" }`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use kasir_core::{CoreError, StoreError, ValidationError};

/// API error returned from HTTP handlers.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Requested quantity exceeds stock (409)
    InsufficientStock,

    /// Storage operation failed (500)
    DatabaseError,

    /// Storage unreachable during a health check (503)
    ServiceUnavailable,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::InsufficientStock => StatusCode::CONFLICT,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

/// Converts storage port errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            StoreError::StockConflict {
                product_id,
                requested,
                available,
            } => ApiError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Insufficient stock for product {}: {} available, {} requested",
                    product_id, available, requested
                ),
            ),
            StoreError::Constraint(message) => {
                tracing::warn!("Constraint violation: {}", message);
                ApiError::validation("Invalid reference or value")
            }
            StoreError::Unavailable(e) => {
                tracing::error!("Storage unavailable: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database unavailable")
            }
            StoreError::Internal(e) => {
                tracing::error!("Storage operation failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound { product_id } => ApiError::not_found("Product", product_id),
            err @ CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            err @ CoreError::InvalidRange { .. } => ApiError::validation(err.to_string()),
            CoreError::Persistence(e) => ApiError::from(e),
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(format!("Invalid query: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_core_error_status_codes() {
        let cases = [
            (CoreError::ProductNotFound { product_id: 9 }, StatusCode::NOT_FOUND),
            (
                CoreError::InsufficientStock {
                    product_id: 1,
                    product_name: "Indomie Bangladesh".to_string(),
                    requested: 25,
                    available: 20,
                },
                StatusCode::CONFLICT,
            ),
            (
                CoreError::InvalidRange {
                    start: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
                    end: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                CoreError::Validation(ValidationError::MustBePositive {
                    field: "quantity".to_string(),
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                CoreError::Persistence(StoreError::Internal("disk I/O error".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_internal_details_are_not_leaked() {
        let api = ApiError::from(StoreError::Internal("near \"SELEC\": syntax error".to_string()));

        assert_eq!(api.code, ErrorCode::DatabaseError);
        assert!(!api.message.contains("SELEC"));
    }

    #[test]
    fn test_serialized_shape() {
        let body = serde_json::to_value(ApiError::not_found("Product", 9)).unwrap();

        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["message"], "Product not found: 9");
    }

    #[test]
    fn test_stock_conflict_is_conflict() {
        let api = ApiError::from(CoreError::Persistence(StoreError::StockConflict {
            product_id: 1,
            requested: 3,
            available: 1,
        }));
        assert_eq!(api.status(), StatusCode::CONFLICT);
        assert_eq!(api.code, ErrorCode::InsufficientStock);
    }
}
