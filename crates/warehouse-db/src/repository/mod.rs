//! # Repository Module
//!
//! Product storage behind a single trait so the service layer never knows
//! which backend it is talking to.
//!
//! ## Store Seam
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         ProductStore                                    │
//! │                                                                         │
//! │  WarehouseService<S: ProductStore>                                     │
//! │       │                                                                 │
//! │       │  store.get(id) / store.update_quantities(&product)             │
//! │       ▼                                                                 │
//! │  ┌──────────────────────────┐      ┌──────────────────────────┐        │
//! │  │ ProductRepository        │      │ MemoryProductStore       │        │
//! │  │ (SQLite, sqlx pool)      │      │ (BTreeMap behind RwLock) │        │
//! │  └──────────────────────────┘      └──────────────────────────┘        │
//! │                                                                         │
//! │  CatalogStore wraps either one when the choice is made at runtime.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Write Contract
//! Quantity writes are compare-and-swap on [`Product::version`]. A store
//! commits the new quantities only if the stored version still equals the
//! version the caller read, and bumps the version on success. A lost race
//! is reported as [`WriteOutcome::Conflict`], never as an error.
//!
//! ## Available Stores
//!
//! - [`ProductRepository`] - SQLite-backed store
//! - [`MemoryProductStore`] - in-process store for tests and `storage = "memory"`

pub mod memory;
pub mod product;

use std::future::Future;

use warehouse_core::Product;

use crate::error::DbResult;

pub use memory::MemoryProductStore;
pub use product::ProductRepository;

// =============================================================================
// Write Outcome
// =============================================================================

/// Result of a compare-and-swap quantity write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The write landed; the stored version was bumped.
    Committed,
    /// Another writer got there first; nothing was written.
    Conflict,
}

// =============================================================================
// Store Trait
// =============================================================================

/// Storage operations over the product catalog.
///
/// Every method is a single atomic step. Multi-step consistency (read,
/// decide, write) is the service's job.
pub trait ProductStore: Send + Sync {
    /// All products, ordered by id.
    fn list(&self) -> impl Future<Output = DbResult<Vec<Product>>> + Send;

    /// A single product, or `None` if the id is unknown.
    fn get(&self, id: i64) -> impl Future<Output = DbResult<Option<Product>>> + Send;

    /// Every stored product name.
    fn names(&self) -> impl Future<Output = DbResult<Vec<String>>> + Send;

    /// Inserts a product under `name` with the given stock and no
    /// reservations. The store assigns the id.
    ///
    /// ## Errors
    /// * [`crate::DbError::UniqueViolation`] - `name` is already taken
    fn insert(
        &self,
        name: &str,
        in_stock_quantity: i64,
    ) -> impl Future<Output = DbResult<Product>> + Send;

    /// Writes `product`'s quantities if the stored version still equals
    /// `product.version`.
    fn update_quantities(
        &self,
        product: &Product,
    ) -> impl Future<Output = DbResult<WriteOutcome>> + Send;

    /// Number of stored products.
    fn count(&self) -> impl Future<Output = DbResult<i64>> + Send;

    /// Products matching `predicate`, ordered by id.
    fn query<P>(&self, predicate: P) -> impl Future<Output = DbResult<Vec<Product>>> + Send
    where
        P: Fn(&Product) -> bool + Send,
    {
        async move {
            let products = self.list().await?;
            Ok(products.into_iter().filter(|p| predicate(p)).collect())
        }
    }
}

// =============================================================================
// Runtime-selected Store
// =============================================================================

/// Store chosen from configuration at startup.
#[derive(Debug, Clone)]
pub enum CatalogStore {
    Sqlite(ProductRepository),
    Memory(MemoryProductStore),
}

impl From<ProductRepository> for CatalogStore {
    fn from(repo: ProductRepository) -> Self {
        CatalogStore::Sqlite(repo)
    }
}

impl From<MemoryProductStore> for CatalogStore {
    fn from(store: MemoryProductStore) -> Self {
        CatalogStore::Memory(store)
    }
}

impl ProductStore for CatalogStore {
    async fn list(&self) -> DbResult<Vec<Product>> {
        match self {
            CatalogStore::Sqlite(s) => s.list().await,
            CatalogStore::Memory(s) => s.list().await,
        }
    }

    async fn get(&self, id: i64) -> DbResult<Option<Product>> {
        match self {
            CatalogStore::Sqlite(s) => s.get(id).await,
            CatalogStore::Memory(s) => s.get(id).await,
        }
    }

    async fn names(&self) -> DbResult<Vec<String>> {
        match self {
            CatalogStore::Sqlite(s) => s.names().await,
            CatalogStore::Memory(s) => s.names().await,
        }
    }

    async fn insert(&self, name: &str, in_stock_quantity: i64) -> DbResult<Product> {
        match self {
            CatalogStore::Sqlite(s) => s.insert(name, in_stock_quantity).await,
            CatalogStore::Memory(s) => s.insert(name, in_stock_quantity).await,
        }
    }

    async fn update_quantities(&self, product: &Product) -> DbResult<WriteOutcome> {
        match self {
            CatalogStore::Sqlite(s) => s.update_quantities(product).await,
            CatalogStore::Memory(s) => s.update_quantities(product).await,
        }
    }

    async fn count(&self) -> DbResult<i64> {
        match self {
            CatalogStore::Sqlite(s) => s.count().await,
            CatalogStore::Memory(s) => s.count().await,
        }
    }
}
