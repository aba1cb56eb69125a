//! # Checkout Engine
//!
//! Turns a list of (product, quantity) requests into a priced, committed
//! transaction.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         checkout(items)                                 │
//! │                                                                         │
//! │  for item in items (input order):                                      │
//! │     │                                                                   │
//! │     ├── quantity > 0 ?                 no ──► Validation (abort)        │
//! │     ├── ProductLookup::get_by_id       None ─► ProductNotFound (abort)  │
//! │     ├── stock >= quantity ?            no ──► InsufficientStock (abort) │
//! │     ├── subtotal = price × quantity                                     │
//! │     └── push TransactionDetail snapshot                                 │
//! │                                                                         │
//! │  TransactionStore::create_transaction(total, details)                  │
//! │     │                                                                   │
//! │     ├── Ok  ──► Transaction { id, created_at, ... }                     │
//! │     └── Err ──► Persistence (nothing visible)                           │
//! │                                                                         │
//! │  The store is never called when any line fails.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! The engine holds no lock between lookup and commit. Two concurrent
//! checkouts can both pass the stock check on the same stale value. Only a
//! stock-enforcing store (see `kasir-db`) closes that window.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::ports::{ProductLookup, TransactionStore};
use crate::types::{CheckoutItem, NewTransaction, Product, Transaction, TransactionDetail};
use crate::validation::validate_quantity;

/// Validates, prices and commits checkouts.
#[derive(Clone)]
pub struct CheckoutEngine {
    products: Arc<dyn ProductLookup>,
    transactions: Arc<dyn TransactionStore>,
}

impl CheckoutEngine {
    pub fn new(products: Arc<dyn ProductLookup>, transactions: Arc<dyn TransactionStore>) -> Self {
        CheckoutEngine {
            products,
            transactions,
        }
    }

    /// Runs a full checkout.
    ///
    /// ## Returns
    /// * `Ok(Transaction)` - committed, with store-assigned id and timestamp
    /// * `Err(CoreError)` - first failing line wins; nothing was persisted
    ///
    /// An empty `items` slice commits a zero-total transaction.
    pub async fn checkout(&self, items: &[CheckoutItem]) -> CoreResult<Transaction> {
        debug!(lines = items.len(), "Starting checkout");

        let pending = self.price_items(items).await?;
        let total = pending.total_amount;
        let line_count = pending.details.len();

        let transaction = self.transactions.create_transaction(pending).await?;

        info!(
            transaction_id = transaction.id,
            total = %total,
            lines = line_count,
            "Checkout committed"
        );
        Ok(transaction)
    }

    /// Resolves and prices every line without committing anything.
    pub async fn price_items(&self, items: &[CheckoutItem]) -> CoreResult<NewTransaction> {
        let mut total_amount = Money::zero();
        let mut details = Vec::with_capacity(items.len());

        for item in items {
            validate_quantity(item.quantity)?;

            let product = self
                .products
                .get_by_id(item.product_id)
                .await?
                .ok_or(CoreError::ProductNotFound {
                    product_id: item.product_id,
                })?;

            let detail = price_line(&product, item.quantity)?;
            total_amount = total_amount
                .checked_add(detail.subtotal)
                .ok_or_else(|| ValidationError::Overflow {
                    field: "total_amount".to_string(),
                })?;

            debug!(
                product_id = product.id,
                quantity = item.quantity,
                subtotal = %detail.subtotal,
                "Line priced"
            );
            details.push(detail);
        }

        Ok(NewTransaction {
            total_amount,
            details,
        })
    }
}

/// Checks stock and snapshots one line against the product as it is now.
pub fn price_line(product: &Product, quantity: i64) -> CoreResult<TransactionDetail> {
    if !product.has_stock_for(quantity) {
        warn!(
            product_id = product.id,
            requested = quantity,
            available = product.stock,
            "Insufficient stock"
        );
        return Err(CoreError::InsufficientStock {
            product_id: product.id,
            product_name: product.name.clone(),
            requested: quantity,
            available: product.stock,
        });
    }

    let subtotal =
        product
            .price
            .checked_mul_quantity(quantity)
            .ok_or_else(|| ValidationError::Overflow {
                field: "subtotal".to_string(),
            })?;

    Ok(TransactionDetail {
        product_id: product.id,
        product_name: product.name.clone(),
        unit_price: product.price,
        quantity,
        subtotal,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::testing::{FakeCatalog, FakeStore};

    const INDOMIE: i64 = 1;
    const TEH_TARIK: i64 = 2;

    fn engine(catalog: &Arc<FakeCatalog>, store: &Arc<FakeStore>) -> CheckoutEngine {
        CheckoutEngine::new(catalog.clone(), store.clone())
    }

    fn seeded() -> (Arc<FakeCatalog>, Arc<FakeStore>) {
        let catalog = Arc::new(FakeCatalog::new());
        catalog.insert(INDOMIE, "Indomie Bangladesh", 7500, 20);
        catalog.insert(TEH_TARIK, "Teh Tarik", 3000, 30);
        (catalog, Arc::new(FakeStore::new()))
    }

    #[tokio::test]
    async fn test_checkout_totals_and_order() {
        let (catalog, store) = seeded();
        let items = [
            CheckoutItem::new(INDOMIE, 2),
            CheckoutItem::new(TEH_TARIK, 5),
        ];

        let tx = engine(&catalog, &store).checkout(&items).await.unwrap();

        assert_eq!(tx.total_amount.units(), 30000);
        assert_eq!(tx.details.len(), 2);
        assert_eq!(tx.details[0].product_id, INDOMIE);
        assert_eq!(tx.details[0].product_name, "Indomie Bangladesh");
        assert_eq!(tx.details[0].subtotal.units(), 15000);
        assert_eq!(tx.details[1].product_id, TEH_TARIK);
        assert_eq!(tx.details[1].subtotal.units(), 15000);
        assert!(tx.total_matches_details());
        assert_eq!(store.commit_count(), 1);
    }

    #[tokio::test]
    async fn test_insufficient_stock_commits_nothing() {
        let (catalog, store) = seeded();

        let err = engine(&catalog, &store)
            .checkout(&[CheckoutItem::new(INDOMIE, 25)])
            .await
            .unwrap_err();

        match err {
            CoreError::InsufficientStock {
                product_id,
                product_name,
                requested,
                available,
            } => {
                assert_eq!(product_id, INDOMIE);
                assert_eq!(product_name, "Indomie Bangladesh");
                assert_eq!(requested, 25);
                assert_eq!(available, 20);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.commit_count(), 0);
    }

    #[tokio::test]
    async fn test_exact_stock_is_allowed() {
        let (catalog, store) = seeded();
        let tx = engine(&catalog, &store)
            .checkout(&[CheckoutItem::new(INDOMIE, 20)])
            .await
            .unwrap();
        assert_eq!(tx.total_amount.units(), 150000);
    }

    #[tokio::test]
    async fn test_unknown_product_stops_processing() {
        let (catalog, store) = seeded();
        let items = [
            CheckoutItem::new(INDOMIE, 1),
            CheckoutItem::new(99, 1),
            CheckoutItem::new(TEH_TARIK, 1),
        ];

        let err = engine(&catalog, &store).checkout(&items).await.unwrap_err();

        assert!(matches!(err, CoreError::ProductNotFound { product_id: 99 }));
        assert_eq!(catalog.lookups(), vec![INDOMIE, 99]);
        assert_eq!(store.commit_count(), 0);
    }

    #[tokio::test]
    async fn test_first_violation_wins() {
        let (catalog, store) = seeded();
        let items = [
            CheckoutItem::new(TEH_TARIK, 31),
            CheckoutItem::new(INDOMIE, 25),
        ];

        let err = engine(&catalog, &store).checkout(&items).await.unwrap_err();

        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                product_id: TEH_TARIK,
                ..
            }
        ));
        assert_eq!(catalog.lookups(), vec![TEH_TARIK]);
    }

    #[tokio::test]
    async fn test_empty_checkout_commits_zero_total() {
        let (catalog, store) = seeded();
        let tx = engine(&catalog, &store).checkout(&[]).await.unwrap();
        assert!(tx.total_amount.is_zero());
        assert!(tx.details.is_empty());
        assert_eq!(store.commit_count(), 1);
    }

    #[tokio::test]
    async fn test_non_positive_quantity_rejected_before_lookup() {
        let (catalog, store) = seeded();
        let err = engine(&catalog, &store)
            .checkout(&[CheckoutItem::new(INDOMIE, 0)])
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(catalog.lookups().is_empty());
        assert_eq!(store.commit_count(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_is_persistence_error() {
        let (catalog, _) = seeded();
        let store = Arc::new(FakeStore::failing(StoreError::Unavailable(
            "disk full".to_string(),
        )));

        let err = engine(&catalog, &store)
            .checkout(&[CheckoutItem::new(INDOMIE, 1)])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CoreError::Persistence(StoreError::Unavailable(_))
        ));
        assert_eq!(store.commit_count(), 0);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_persistence_error() {
        let (catalog, store) = seeded();
        catalog.fail_with(StoreError::Internal("connection reset".to_string()));

        let err = engine(&catalog, &store)
            .checkout(&[CheckoutItem::new(INDOMIE, 1)])
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Persistence(_)));
        assert_eq!(store.commit_count(), 0);
    }

    #[tokio::test]
    async fn test_details_are_snapshots() {
        let (catalog, store) = seeded();
        let engine = engine(&catalog, &store);

        let tx = engine
            .checkout(&[CheckoutItem::new(INDOMIE, 2)])
            .await
            .unwrap();
        catalog.insert(INDOMIE, "Indomie Goreng", 9000, 20);

        assert_eq!(tx.details[0].product_name, "Indomie Bangladesh");
        assert_eq!(tx.details[0].unit_price.units(), 7500);
        assert_eq!(store.committed()[0].details[0].unit_price.units(), 7500);
    }

    #[test]
    fn test_price_line_overflow() {
        let product = Product {
            id: 1,
            name: "Emas".to_string(),
            price: Money::from_units(i64::MAX / 2 + 1),
            stock: 10,
            category_id: None,
        };
        let err = price_line(&product, 2).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Overflow { .. })
        ));
    }
}
