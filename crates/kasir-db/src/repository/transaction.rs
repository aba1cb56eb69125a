//! # Transaction Repository
//!
//! Persists checkouts and aggregates them into sales reports.
//!
//! ## Commit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    create(NewTransaction)                               │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    INSERT transactions (total_amount, created_at) RETURNING id          │
//! │    for each detail:                                                     │
//! │      [decrement_stock] UPDATE products SET stock = stock - qty          │
//! │                        WHERE id = ? AND stock >= qty                    │
//! │                        0 rows → StockConflict, ROLLBACK                 │
//! │      INSERT transaction_details (snapshot name + unit price)            │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any error drops the sqlx transaction, which rolls back.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `created_at` is stored as RFC 3339 UTC text truncated to microseconds,
//! so `BETWEEN` on the text column is a time comparison.

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use kasir_core::{
    BestSeller, Money, NewTransaction, ProductId, ReportWindow, SalesReport, StoreResult,
    Transaction, TransactionDetail, TransactionId, TransactionStore,
};

use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: TransactionId,
    total_amount: Money,
    created_at: DateTime<Utc>,
}

type DetailRow = (ProductId, String, Money, i64, Money);

/// Repository for transaction database operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
    decrement_stock: bool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    ///
    /// With `decrement_stock` set, each commit also takes the sold
    /// quantities off product stock in the same database transaction.
    pub fn new(pool: SqlitePool, decrement_stock: bool) -> Self {
        TransactionRepository {
            pool,
            decrement_stock,
        }
    }

    /// Writes the header and all details atomically.
    ///
    /// ## Returns
    /// * `Ok(Transaction)` - Committed, with store-assigned id and timestamp
    /// * `Err(DbError::StockConflict)` - Stock decrement found too little stock
    pub async fn create(&self, new: NewTransaction) -> DbResult<Transaction> {
        let created_at = Utc::now().trunc_subsecs(6);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let id: TransactionId = sqlx::query_scalar(
            "INSERT INTO transactions (total_amount, created_at) VALUES (?1, ?2) RETURNING id",
        )
        .bind(new.total_amount)
        .bind(created_at)
        .fetch_one(&mut *tx)
        .await?;

        debug!(id = id, lines = new.details.len(), "Inserting transaction");

        for detail in &new.details {
            if self.decrement_stock {
                let result = sqlx::query(
                    "UPDATE products SET stock = stock - ?2 WHERE id = ?1 AND stock >= ?2",
                )
                .bind(detail.product_id)
                .bind(detail.quantity)
                .execute(&mut *tx)
                .await?;

                if result.rows_affected() == 0 {
                    let available: Option<i64> =
                        sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
                            .bind(detail.product_id)
                            .fetch_optional(&mut *tx)
                            .await?;

                    warn!(
                        product_id = detail.product_id,
                        requested = detail.quantity,
                        "Stock changed before commit, rolling back"
                    );
                    return Err(DbError::StockConflict {
                        product_id: detail.product_id,
                        requested: detail.quantity,
                        available: available.unwrap_or(0),
                    });
                }
            }

            sqlx::query(
                "INSERT INTO transaction_details \
                 (transaction_id, product_id, product_name, unit_price, quantity, subtotal) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(id)
            .bind(detail.product_id)
            .bind(&detail.product_name)
            .bind(detail.unit_price)
            .bind(detail.quantity)
            .bind(detail.subtotal)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(new.into_committed(id, created_at))
    }

    /// Gets a committed transaction with its details in insertion order.
    pub async fn get_by_id(&self, id: TransactionId) -> DbResult<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(
            "SELECT id, total_amount, created_at FROM transactions WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let details = sqlx::query_as::<_, DetailRow>(
            "SELECT product_id, product_name, unit_price, quantity, subtotal \
             FROM transaction_details WHERE transaction_id = ?1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(
            |(product_id, product_name, unit_price, quantity, subtotal)| TransactionDetail {
                product_id,
                product_name,
                unit_price,
                quantity,
                subtotal,
            },
        )
        .collect();

        Ok(Some(Transaction {
            id: row.id,
            total_amount: row.total_amount,
            created_at: row.created_at,
            details,
        }))
    }

    /// Revenue, count and best seller for transactions inside `window`.
    ///
    /// The best seller is the product with the highest summed quantity;
    /// ties go to the lowest product id. Its name is the snapshot from the
    /// most recent sale in the window.
    pub async fn summary(&self, window: ReportWindow) -> DbResult<SalesReport> {
        let (revenue, count): (i64, i64) = sqlx::query_as(
            "SELECT COALESCE(SUM(total_amount), 0), COUNT(*) \
             FROM transactions WHERE created_at BETWEEN ?1 AND ?2",
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_one(&self.pool)
        .await?;

        let best: Option<(String, i64)> = sqlx::query_as(
            "SELECT \
                (SELECT d2.product_name \
                   FROM transaction_details d2 \
                   JOIN transactions t2 ON t2.id = d2.transaction_id \
                  WHERE d2.product_id = d.product_id \
                    AND t2.created_at BETWEEN ?1 AND ?2 \
                  ORDER BY t2.created_at DESC, d2.id DESC \
                  LIMIT 1) AS name, \
                SUM(d.quantity) AS qty \
             FROM transaction_details d \
             JOIN transactions t ON t.id = d.transaction_id \
             WHERE t.created_at BETWEEN ?1 AND ?2 \
             GROUP BY d.product_id \
             ORDER BY qty DESC, d.product_id ASC \
             LIMIT 1",
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_optional(&self.pool)
        .await?;

        let best_seller = match best {
            Some((name, quantity)) => BestSeller { name, quantity },
            None => BestSeller::none(),
        };

        debug!(revenue = revenue, count = count, "Summarized transactions");

        Ok(SalesReport {
            total_revenue: Money::from_units(revenue),
            transaction_count: count,
            best_seller,
        })
    }

    /// Counts committed transactions.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl TransactionStore for TransactionRepository {
    async fn create_transaction(&self, transaction: NewTransaction) -> StoreResult<Transaction> {
        Ok(self.create(transaction).await?)
    }

    async fn sales_summary(&self, window: ReportWindow) -> StoreResult<SalesReport> {
        Ok(self.summary(window).await?)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
