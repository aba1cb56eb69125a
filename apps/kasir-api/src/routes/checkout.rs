//! # Checkout Route
//!
//! `POST /api/checkout` with `{ "items": [{ "product_id": 1, "quantity": 2 }] }`.
//! Responds 201 with the committed transaction.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use kasir_core::{CheckoutRequest, Transaction};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn checkout(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let Json(request) = payload?;

    let transaction = state.checkout.checkout(&request.items).await?;

    info!(
        id = transaction.id,
        total = %transaction.total_amount,
        "Checkout request completed"
    );
    Ok((StatusCode::CREATED, Json(transaction)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::routes::test_support::memory_state;
    use axum::response::IntoResponse;
    use kasir_core::{CheckoutItem, Money};

    fn request(items: &[(i64, i64)]) -> Result<Json<CheckoutRequest>, JsonRejection> {
        Ok(Json(CheckoutRequest {
            items: items
                .iter()
                .map(|&(product_id, quantity)| CheckoutItem::new(product_id, quantity))
                .collect(),
        }))
    }

    #[tokio::test]
    async fn test_checkout_created() {
        let state = memory_state(false);

        let (status, Json(tx)) = checkout(State(state), request(&[(1, 2), (2, 5)]))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(tx.total_amount, Money::from_units(30000));
        assert_eq!(tx.details.len(), 2);
        assert_eq!(tx.details[0].product_name, "Indomie Bangladesh");
        assert_eq!(tx.details[1].subtotal, Money::from_units(15000));
    }

    #[tokio::test]
    async fn test_checkout_insufficient_stock_is_409() {
        let state = memory_state(false);

        let err = checkout(State(state.clone()), request(&[(1, 25)]))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);

        let report = state.reports.daily_report().await.unwrap();
        assert_eq!(report.transaction_count, 0);
    }

    #[tokio::test]
    async fn test_checkout_unknown_product_is_404() {
        let err = checkout(State(memory_state(false)), request(&[(99, 1)]))
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_checkout_zero_quantity_is_400() {
        let err = checkout(State(memory_state(false)), request(&[(1, 0)]))
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_checkout_decrements_when_enabled() {
        let state = memory_state(true);

        checkout(State(state.clone()), request(&[(2, 5)])).await.unwrap();

        let teh = state.catalog.get_product(2).await.unwrap().unwrap();
        assert_eq!(teh.stock, 25);
    }
}
