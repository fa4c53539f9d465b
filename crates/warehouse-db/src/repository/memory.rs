//! # In-Memory Product Store
//!
//! A [`ProductStore`] that keeps the catalog in a `BTreeMap`. Same contract
//! as the SQLite repository: ids start at 1 and are never reused, names are
//! unique, quantity writes are compare-and-swap on `version`.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::{DbError, DbResult};
use crate::repository::{ProductStore, WriteOutcome};
use warehouse_core::Product;

#[derive(Debug)]
struct MemoryCatalog {
    products: BTreeMap<i64, Product>,
    next_id: i64,
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        MemoryCatalog {
            products: BTreeMap::new(),
            next_id: 1,
        }
    }
}

/// In-process product store.
///
/// Clones share the same catalog.
#[derive(Debug, Clone, Default)]
pub struct MemoryProductStore {
    inner: Arc<RwLock<MemoryCatalog>>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProductStore for MemoryProductStore {
    async fn list(&self) -> DbResult<Vec<Product>> {
        let catalog = self.inner.read().await;
        Ok(catalog.products.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> DbResult<Option<Product>> {
        let catalog = self.inner.read().await;
        Ok(catalog.products.get(&id).cloned())
    }

    async fn names(&self) -> DbResult<Vec<String>> {
        let catalog = self.inner.read().await;
        Ok(catalog.products.values().map(|p| p.name.clone()).collect())
    }

    async fn insert(&self, name: &str, in_stock_quantity: i64) -> DbResult<Product> {
        let mut catalog = self.inner.write().await;

        if catalog.products.values().any(|p| p.name == name) {
            return Err(DbError::duplicate("products.name", name));
        }

        let id = catalog.next_id;
        catalog.next_id += 1;

        let product = Product::new(id, name, in_stock_quantity);
        catalog.products.insert(id, product.clone());
        Ok(product)
    }

    async fn update_quantities(&self, product: &Product) -> DbResult<WriteOutcome> {
        let mut catalog = self.inner.write().await;

        let Some(stored) = catalog.products.get_mut(&product.id) else {
            return Ok(WriteOutcome::Conflict);
        };
        if stored.version != product.version {
            return Ok(WriteOutcome::Conflict);
        }

        stored.in_stock_quantity = product.in_stock_quantity;
        stored.reserved_quantity = product.reserved_quantity;
        stored.version += 1;
        Ok(WriteOutcome::Committed)
    }

    async fn count(&self) -> DbResult<i64> {
        let catalog = self.inner.read().await;
        Ok(catalog.products.len() as i64)
    }
}
