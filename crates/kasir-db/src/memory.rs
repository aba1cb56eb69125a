//! # In-Memory Backend
//!
//! Implements every storage port over `RwLock`-guarded maps. Data lives as
//! long as the process.
//!
//! A checkout commit takes the write guard once, so it is atomic with
//! respect to readers and other commits.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use kasir_core::{
    BestSeller, CatalogStore, Category, CategoryId, CategoryInput, Money, NewTransaction,
    Product, ProductId, ProductInput, ProductLookup, ReportWindow, SalesReport, StoreError,
    StoreResult, Transaction, TransactionStore,
};

#[derive(Debug, Default)]
struct MemoryState {
    products: BTreeMap<ProductId, Product>,
    categories: BTreeMap<CategoryId, Category>,
    transactions: Vec<Transaction>,
    next_product_id: ProductId,
    next_category_id: CategoryId,
    next_transaction_id: i64,
}

impl MemoryState {
    fn next_product_id(&mut self) -> ProductId {
        self.next_product_id += 1;
        self.next_product_id
    }

    fn next_category_id(&mut self) -> CategoryId {
        self.next_category_id += 1;
        self.next_category_id
    }

    fn check_category(&self, category_id: Option<CategoryId>) -> StoreResult<()> {
        match category_id {
            Some(id) if !self.categories.contains_key(&id) => Err(StoreError::Constraint(
                format!("category {id} does not exist"),
            )),
            _ => Ok(()),
        }
    }
}

/// Process-local storage backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: RwLock<MemoryState>,
    decrement_stock: bool,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new(decrement_stock: bool) -> Self {
        MemoryBackend {
            state: RwLock::new(MemoryState::default()),
            decrement_stock,
        }
    }

    /// Creates a backend holding the demo catalog: Makanan and Minuman,
    /// Indomie Bangladesh (Rp 7.500, stock 20) and Teh Tarik (Rp 3.000, stock 30).
    pub fn with_demo_catalog(decrement_stock: bool) -> Self {
        let mut state = MemoryState::default();

        let makanan = state.next_category_id();
        state.categories.insert(
            makanan,
            Category {
                id: makanan,
                name: "Makanan".to_string(),
                description: "Makanan berat dan ringan".to_string(),
            },
        );
        let minuman = state.next_category_id();
        state.categories.insert(
            minuman,
            Category {
                id: minuman,
                name: "Minuman".to_string(),
                description: "Minuman panas dan dingin".to_string(),
            },
        );

        for (name, price, stock, category_id) in [
            ("Indomie Bangladesh", 7500, 20, makanan),
            ("Teh Tarik", 3000, 30, minuman),
        ] {
            let id = state.next_product_id();
            state.products.insert(
                id,
                Product {
                    id,
                    name: name.to_string(),
                    price: Money::from_units(price),
                    stock,
                    category_id: Some(category_id),
                },
            );
        }

        MemoryBackend {
            state: RwLock::new(state),
            decrement_stock,
        }
    }
}

#[async_trait]
impl ProductLookup for MemoryBackend {
    async fn get_by_id(&self, id: ProductId) -> StoreResult<Option<Product>> {
        Ok(self.state.read().await.products.get(&id).cloned())
    }
}

#[async_trait]
impl TransactionStore for MemoryBackend {
    async fn create_transaction(&self, transaction: NewTransaction) -> StoreResult<Transaction> {
        let mut state = self.state.write().await;

        if self.decrement_stock {
            // Repeated lines for one product draw on the same stock
            let mut requested: BTreeMap<ProductId, i64> = BTreeMap::new();
            for detail in &transaction.details {
                *requested.entry(detail.product_id).or_insert(0) += detail.quantity;
            }

            // Check every product before touching anything
            for detail in &transaction.details {
                let wanted = requested[&detail.product_id];
                let available = state
                    .products
                    .get(&detail.product_id)
                    .map(|p| p.stock)
                    .unwrap_or(0);
                if available < wanted {
                    warn!(
                        product_id = detail.product_id,
                        requested = wanted,
                        available = available,
                        "Stock changed before commit"
                    );
                    return Err(StoreError::StockConflict {
                        product_id: detail.product_id,
                        requested: wanted,
                        available,
                    });
                }
            }
            for detail in &transaction.details {
                if let Some(product) = state.products.get_mut(&detail.product_id) {
                    product.stock -= detail.quantity;
                }
            }
        }

        state.next_transaction_id += 1;
        let committed =
            transaction.into_committed(state.next_transaction_id, Utc::now().trunc_subsecs(6));
        state.transactions.push(committed.clone());

        debug!(id = committed.id, "Transaction stored in memory");
        Ok(committed)
    }

    async fn sales_summary(&self, window: ReportWindow) -> StoreResult<SalesReport> {
        let state = self.state.read().await;

        let mut report = SalesReport::empty();
        // product_id -> (quantity, latest snapshot name)
        let mut sold: BTreeMap<ProductId, (i64, &str)> = BTreeMap::new();

        for tx in state.transactions.iter().filter(|tx| window.contains(tx.created_at)) {
            report.total_revenue += tx.total_amount;
            report.transaction_count += 1;
            for detail in &tx.details {
                let entry = sold.entry(detail.product_id).or_insert((0, ""));
                entry.0 += detail.quantity;
                entry.1 = detail.product_name.as_str();
            }
        }

        let mut best: Option<(i64, &str)> = None;
        for (quantity, name) in sold.into_values() {
            if best.map_or(true, |(top, _)| quantity > top) {
                best = Some((quantity, name));
            }
        }
        if let Some((quantity, name)) = best {
            report.best_seller = BestSeller {
                name: name.to_string(),
                quantity,
            };
        }

        Ok(report)
    }
}

#[async_trait]
impl CatalogStore for MemoryBackend {
    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        Ok(self.state.read().await.products.values().cloned().collect())
    }

    async fn get_product(&self, id: ProductId) -> StoreResult<Option<Product>> {
        Ok(self.state.read().await.products.get(&id).cloned())
    }

    async fn create_product(&self, input: ProductInput) -> StoreResult<Product> {
        let mut state = self.state.write().await;
        state.check_category(input.category_id)?;

        let id = state.next_product_id();
        let product = input.into_product(id);
        state.products.insert(id, product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: ProductId, input: ProductInput) -> StoreResult<Product> {
        let mut state = self.state.write().await;
        if !state.products.contains_key(&id) {
            return Err(StoreError::not_found("Product", id));
        }
        state.check_category(input.category_id)?;

        let product = input.into_product(id);
        state.products.insert(id, product.clone());
        Ok(product)
    }

    async fn delete_product(&self, id: ProductId) -> StoreResult<()> {
        self.state
            .write()
            .await
            .products
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("Product", id))
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        Ok(self.state.read().await.categories.values().cloned().collect())
    }

    async fn get_category(&self, id: CategoryId) -> StoreResult<Option<Category>> {
        Ok(self.state.read().await.categories.get(&id).cloned())
    }

    async fn create_category(&self, input: CategoryInput) -> StoreResult<Category> {
        let mut state = self.state.write().await;
        let id = state.next_category_id();
        let category = input.into_category(id);
        state.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        id: CategoryId,
        input: CategoryInput,
    ) -> StoreResult<Category> {
        let mut state = self.state.write().await;
        match state.categories.get_mut(&id) {
            Some(existing) => {
                *existing = input.into_category(id);
                Ok(existing.clone())
            }
            None => Err(StoreError::not_found("Category", id)),
        }
    }

    async fn delete_category(&self, id: CategoryId) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.categories.remove(&id).is_none() {
            return Err(StoreError::not_found("Category", id));
        }
        for product in state.products.values_mut() {
            if product.category_id == Some(id) {
                product.category_id = None;
            }
        }
        Ok(())
    }
}
