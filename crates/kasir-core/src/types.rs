//! # Domain Types
//!
//! Core domain types used throughout Kasir POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │    Category     │◄──│    Product      │   │    CheckoutItem     │   │
//! │  │  ─────────────  │ 0..1 ─────────────  │   │  ─────────────────  │   │
//! │  │  id             │   │  id             │   │  product_id         │   │
//! │  │  name           │   │  name, price    │   │  quantity (> 0)     │   │
//! │  │  description    │   │  stock          │   └──────────┬──────────┘   │
//! │  └─────────────────┘   └─────────────────┘              │ checkout     │
//! │                                                          ▼              │
//! │  ┌─────────────────────────┐      ┌──────────────────────────────────┐ │
//! │  │      Transaction        │ 1..* │      TransactionDetail           │ │
//! │  │  ─────────────────────  │◄─────│  ──────────────────────────────  │ │
//! │  │  id (store-assigned)    │      │  product_id, product_name (snap) │ │
//! │  │  total_amount           │      │  unit_price (snap), quantity     │ │
//! │  │  created_at             │      │  subtotal                        │ │
//! │  └─────────────────────────┘      └──────────────────────────────────┘ │
//! │                                                                         │
//! │  SalesReport { total_revenue, total_transaksi, produk_terlaris }       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Transaction details freeze the product name and price at the moment of
//! sale. Later catalog edits never touch committed transactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Product identifier (assigned by the store on creation).
pub type ProductId = i64;

/// Category identifier.
pub type CategoryId = i64;

/// Transaction identifier (assigned by the store on commit).
pub type TransactionId = i64;

// =============================================================================
// Catalog
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: ProductId,

    /// Display name shown to the cashier and copied onto transaction details.
    pub name: String,

    /// Unit price in the smallest currency unit.
    pub price: Money,

    /// Units currently on hand.
    pub stock: i64,

    /// `None` means uncategorized.
    pub category_id: Option<CategoryId>,
}

impl Product {
    /// Checks whether `quantity` units can be sold from current stock.
    #[inline]
    pub fn has_stock_for(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

/// Fields a client supplies when creating or replacing a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductInput {
    pub name: String,
    pub price: Money,
    pub stock: i64,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

impl ProductInput {
    /// Builds the stored product once an id has been assigned.
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            stock: self.stock,
            category_id: self.category_id,
        }
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
}

/// Fields a client supplies when creating or replacing a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl CategoryInput {
    pub fn into_category(self, id: CategoryId) -> Category {
        Category {
            id,
            name: self.name,
            description: self.description,
        }
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// One requested line of a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutItem {
    pub product_id: ProductId,
    pub quantity: i64,
}

impl CheckoutItem {
    pub const fn new(product_id: ProductId, quantity: i64) -> Self {
        CheckoutItem {
            product_id,
            quantity,
        }
    }
}

/// Request body for a checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
}

/// A line item in a transaction.
/// Uses snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TransactionDetail {
    pub product_id: ProductId,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    /// Unit price at time of sale (frozen).
    pub unit_price: Money,
    pub quantity: i64,
    /// unit_price × quantity.
    pub subtotal: Money,
}

/// A priced transaction that has not been committed yet.
///
/// Built by the checkout engine and handed to a
/// [`TransactionStore`](crate::ports::TransactionStore), which assigns the
/// id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub total_amount: Money,
    pub details: Vec<TransactionDetail>,
}

impl NewTransaction {
    /// Attaches store-assigned identity, producing the committed record.
    pub fn into_committed(self, id: TransactionId, created_at: DateTime<Utc>) -> Transaction {
        Transaction {
            id,
            total_amount: self.total_amount,
            created_at,
            details: self.details,
        }
    }
}

/// A committed sales transaction. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Transaction {
    pub id: TransactionId,
    pub total_amount: Money,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    /// In checkout input order.
    pub details: Vec<TransactionDetail>,
}

impl Transaction {
    /// Checks the header total against the detail subtotals.
    pub fn total_matches_details(&self) -> bool {
        self.details.iter().map(|d| d.subtotal).sum::<Money>() == self.total_amount
    }
}

// =============================================================================
// Reports
// =============================================================================

/// Best-selling product within a report window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BestSeller {
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "qty_terjual")]
    pub quantity: i64,
}

impl BestSeller {
    /// Name used when a window has no sales.
    pub const NO_SALES_NAME: &'static str = "-";

    /// The "no sales" sentinel.
    pub fn none() -> Self {
        BestSeller {
            name: Self::NO_SALES_NAME.to_string(),
            quantity: 0,
        }
    }

    pub fn is_none(&self) -> bool {
        self.quantity == 0 && self.name == Self::NO_SALES_NAME
    }
}

impl Default for BestSeller {
    fn default() -> Self {
        BestSeller::none()
    }
}

/// Aggregated sales over a window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesReport {
    pub total_revenue: Money,
    #[serde(rename = "total_transaksi")]
    pub transaction_count: i64,
    #[serde(rename = "produk_terlaris")]
    pub best_seller: BestSeller,
}

impl SalesReport {
    /// Zero-valued report for a window without transactions.
    pub fn empty() -> Self {
        SalesReport::default()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(product_id: ProductId, price: i64, qty: i64) -> TransactionDetail {
        TransactionDetail {
            product_id,
            product_name: format!("P{}", product_id),
            unit_price: Money::from_units(price),
            quantity: qty,
            subtotal: Money::from_units(price * qty),
        }
    }

    #[test]
    fn test_has_stock_for() {
        let product = Product {
            id: 1,
            name: "Indomie Bangladesh".to_string(),
            price: Money::from_units(7500),
            stock: 20,
            category_id: None,
        };
        assert!(product.has_stock_for(20));
        assert!(!product.has_stock_for(21));
    }

    #[test]
    fn test_empty_report_uses_sentinel() {
        let report = SalesReport::empty();
        assert!(report.total_revenue.is_zero());
        assert_eq!(report.transaction_count, 0);
        assert_eq!(report.best_seller.name, "-");
        assert_eq!(report.best_seller.quantity, 0);
        assert!(report.best_seller.is_none());
    }

    #[test]
    fn test_report_json_field_names() {
        let report = SalesReport {
            total_revenue: Money::from_units(30000),
            transaction_count: 1,
            best_seller: BestSeller {
                name: "Teh Tarik".to_string(),
                quantity: 5,
            },
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total_revenue"], 30000);
        assert_eq!(json["total_transaksi"], 1);
        assert_eq!(json["produk_terlaris"]["nama"], "Teh Tarik");
        assert_eq!(json["produk_terlaris"]["qty_terjual"], 5);
    }

    #[test]
    fn test_committed_transaction_keeps_details() {
        let new_tx = NewTransaction {
            total_amount: Money::from_units(30000),
            details: vec![detail(1, 7500, 2), detail(2, 3000, 5)],
        };
        let tx = new_tx.into_committed(7, Utc::now());
        assert_eq!(tx.id, 7);
        assert_eq!(tx.details[0].product_id, 1);
        assert_eq!(tx.details[1].product_id, 2);
        assert!(tx.total_matches_details());
    }

    #[test]
    fn test_product_input_category_defaults_to_none() {
        let input: ProductInput =
            serde_json::from_str(r#"{"name":"Kopi","price":5000,"stock":3}"#).unwrap();
        assert_eq!(input.category_id, None);
        let product = input.into_product(9);
        assert_eq!(product.id, 9);
        assert_eq!(product.price.units(), 5000);
    }
}
