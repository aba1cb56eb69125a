//! Recording test doubles for the storage ports.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{StoreError, StoreResult};
use crate::money::Money;
use crate::ports::{ProductLookup, TransactionStore};
use crate::report::ReportWindow;
use crate::types::{NewTransaction, Product, ProductId, SalesReport, Transaction};

/// Product lookup that records every id it is asked for.
#[derive(Default)]
pub struct FakeCatalog {
    products: Mutex<HashMap<ProductId, Product>>,
    lookups: Mutex<Vec<ProductId>>,
    failure: Mutex<Option<StoreError>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: ProductId, name: &str, price: i64, stock: i64) {
        self.products.lock().unwrap().insert(
            id,
            Product {
                id,
                name: name.to_string(),
                price: Money::from_units(price),
                stock,
                category_id: None,
            },
        );
    }

    pub fn fail_with(&self, err: StoreError) {
        *self.failure.lock().unwrap() = Some(err);
    }

    pub fn lookups(&self) -> Vec<ProductId> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProductLookup for FakeCatalog {
    async fn get_by_id(&self, id: ProductId) -> StoreResult<Option<Product>> {
        self.lookups.lock().unwrap().push(id);
        if let Some(err) = self.failure.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.products.lock().unwrap().get(&id).cloned())
    }
}

/// Transaction store that keeps commits in memory and records report windows.
#[derive(Default)]
pub struct FakeStore {
    committed: Mutex<Vec<NewTransaction>>,
    windows: Mutex<Vec<ReportWindow>>,
    failure: Option<StoreError>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(err: StoreError) -> Self {
        FakeStore {
            failure: Some(err),
            ..Self::default()
        }
    }

    pub fn commit_count(&self) -> usize {
        self.committed.lock().unwrap().len()
    }

    pub fn committed(&self) -> Vec<NewTransaction> {
        self.committed.lock().unwrap().clone()
    }

    pub fn windows(&self) -> Vec<ReportWindow> {
        self.windows.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransactionStore for FakeStore {
    async fn create_transaction(&self, transaction: NewTransaction) -> StoreResult<Transaction> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        let mut committed = self.committed.lock().unwrap();
        committed.push(transaction.clone());
        Ok(transaction.into_committed(committed.len() as i64, Utc::now()))
    }

    async fn sales_summary(&self, window: ReportWindow) -> StoreResult<SalesReport> {
        self.windows.lock().unwrap().push(window);
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(SalesReport::empty())
    }
}
