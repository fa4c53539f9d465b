//! # Warehouse Service
//!
//! Orchestrates one request end to end: validate, load, run the pure core
//! logic, persist.
//!
//! ## Quantity Update Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    order_item / ship_item / restock_item                │
//! │                                                                         │
//! │  QuantityUpdateRequest { id, quantity }                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  quantity < 0 ? ─────────────────────────► UpdateResult(QuantityInvalid)│
//! │       │                                                                 │
//! │       ▼  per-product lock                                              │
//! │  ┌──────────────────────────────────────────────────┐                  │
//! │  │  store.get(id) ── None ──► UpdateResult(InvalidRequest)             │
//! │  │       │                                          │                  │
//! │  │       ▼                                          │                  │
//! │  │  inventory::apply ── Err ──► UpdateResult(reason)│                  │
//! │  │       │                                          │                  │
//! │  │       ▼                                          │                  │
//! │  │  store.update_quantities (CAS)                   │                  │
//! │  │       ├── Committed ──► UpdateResult::ok()       │                  │
//! │  │       └── Conflict  ──► re-read (max 8 attempts) │                  │
//! │  └──────────────────────────────────────────────────┘                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The per-product lock serializes writers inside this process. The version
//! check in the store covers writers in other processes sharing the same
//! database file.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as SyncMutex, PoisonError};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use warehouse_core::inventory::{self, Transition};
use warehouse_core::naming::resolve_unique_name_in;
use warehouse_core::validation::{
    validate_in_stock_quantity, validate_product_name, validate_quantity,
};
use warehouse_core::{
    CreateResult, ErrorReason, NewProduct, Product, QuantityUpdateRequest, UpdateResult,
};

use crate::error::{DbError, DbResult};
use crate::repository::{ProductStore, WriteOutcome};

/// How many times a write is retried after losing a race before the
/// request is failed as an infrastructure fault.
pub const MAX_WRITE_ATTEMPTS: usize = 8;

// =============================================================================
// Service
// =============================================================================

/// Catalog operations over any [`ProductStore`].
///
/// ## Usage
/// ```rust,ignore
/// let service = WarehouseService::new(MemoryProductStore::new());
///
/// let created = service.add_product(NewProduct::new("Widget", 5)).await?;
/// let id = created.model.unwrap().id;
///
/// let result = service.order_item(QuantityUpdateRequest::new(id, 2)).await?;
/// assert!(result.success);
/// ```
#[derive(Debug)]
pub struct WarehouseService<S> {
    store: S,
    item_locks: ItemLocks,
    create_lock: Mutex<()>,
}

impl<S: ProductStore> WarehouseService<S> {
    pub fn new(store: S) -> Self {
        WarehouseService {
            store,
            item_locks: ItemLocks::default(),
            create_lock: Mutex::new(()),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn list_products(&self) -> DbResult<Vec<Product>> {
        self.store.list().await
    }

    pub async fn get_product(&self, id: i64) -> DbResult<Option<Product>> {
        self.store.get(id).await
    }

    /// Products with stock left to order: in stock above zero and above
    /// what is already reserved.
    pub async fn in_stock_products(&self) -> DbResult<Vec<Product>> {
        self.store.query(Product::is_in_stock).await
    }

    // =========================================================================
    // Quantity Transitions
    // =========================================================================

    /// Reserves `request.quantity` units.
    pub async fn order_item(&self, request: QuantityUpdateRequest) -> DbResult<UpdateResult> {
        self.transition(Transition::Order, request).await
    }

    /// Ships `request.quantity` units out of stock and reservations.
    pub async fn ship_item(&self, request: QuantityUpdateRequest) -> DbResult<UpdateResult> {
        self.transition(Transition::Ship, request).await
    }

    /// Adds `request.quantity` units to stock.
    pub async fn restock_item(&self, request: QuantityUpdateRequest) -> DbResult<UpdateResult> {
        self.transition(Transition::Restock, request).await
    }

    async fn transition(
        &self,
        transition: Transition,
        request: QuantityUpdateRequest,
    ) -> DbResult<UpdateResult> {
        // Sign first: a negative amount is rejected even for unknown ids
        if let Err(e) = validate_quantity(request.quantity) {
            debug!(%transition, id = request.id, quantity = request.quantity, "Rejected amount");
            return Ok(UpdateResult::failed(e.into()));
        }

        // The lease is dropped on every exit, including cancellation while waiting
        let lease = self.item_locks.lease(request.id);
        let _guard = lease.lock.lock().await;
        self.transition_locked(transition, request).await
    }

    async fn transition_locked(
        &self,
        transition: Transition,
        request: QuantityUpdateRequest,
    ) -> DbResult<UpdateResult> {
        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let Some(current) = self.store.get(request.id).await? else {
                debug!(%transition, id = request.id, "Unknown product");
                return Ok(UpdateResult::failed(ErrorReason::InvalidRequest));
            };

            let next = match inventory::apply(transition, &current, request.quantity) {
                Ok(next) => next,
                Err(reason) => {
                    debug!(
                        %transition,
                        id = request.id,
                        quantity = request.quantity,
                        in_stock = current.in_stock_quantity,
                        reserved = current.reserved_quantity,
                        %reason,
                        "Transition rejected"
                    );
                    return Ok(UpdateResult::failed(reason));
                }
            };

            match self.store.update_quantities(&next).await? {
                WriteOutcome::Committed => {
                    info!(
                        %transition,
                        id = next.id,
                        in_stock = next.in_stock_quantity,
                        reserved = next.reserved_quantity,
                        "Quantities updated"
                    );
                    return Ok(UpdateResult::ok());
                }
                WriteOutcome::Conflict => {
                    warn!(%transition, id = request.id, attempt, "Concurrent write, retrying");
                }
            }
        }

        Err(DbError::TransactionFailed(format!(
            "{transition} on product {} lost {MAX_WRITE_ATTEMPTS} consecutive write races",
            request.id
        )))
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Creates a product under a unique name.
    ///
    /// A taken name is disambiguated (`Widget` becomes `Widget(1)`), never
    /// rejected. The requested id and reserved quantity are ignored.
    ///
    /// ## Rejections
    /// - `QuantityInvalid` - negative in-stock quantity
    /// - `InvalidRequest` - blank name
    pub async fn add_product(&self, request: NewProduct) -> DbResult<CreateResult<Product>> {
        if let Err(e) = validate_in_stock_quantity(request.in_stock_quantity) {
            debug!(in_stock = request.in_stock_quantity, "Rejected new product quantity");
            return Ok(CreateResult::failed(e.into()));
        }

        let candidate = match validate_product_name(&request.name) {
            Ok(name) => name.to_string(),
            Err(e) => {
                debug!(error = %e, "Rejected new product name");
                return Ok(CreateResult::failed(e.into()));
            }
        };

        let _guard = self.create_lock.lock().await;

        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let existing = self.store.names().await?;
            let name = resolve_unique_name_in(&candidate, &existing);

            match self.store.insert(&name, request.in_stock_quantity).await {
                Ok(product) => {
                    info!(
                        id = product.id,
                        name = %product.name,
                        in_stock = product.in_stock_quantity,
                        "Product created"
                    );
                    return Ok(CreateResult::created(product));
                }
                Err(DbError::UniqueViolation { .. }) => {
                    warn!(name = %name, attempt, "Name taken concurrently, resolving again");
                }
                Err(e) => return Err(e),
            }
        }

        Err(DbError::TransactionFailed(format!(
            "could not find a free name for '{candidate}' in {MAX_WRITE_ATTEMPTS} attempts"
        )))
    }
}

// =============================================================================
// Per-Product Locks
// =============================================================================

/// Per-id async locks, created on demand and dropped once unused.
#[derive(Debug, Default)]
struct ItemLocks {
    map: SyncMutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl ItemLocks {
    fn lease(&self, id: i64) -> ItemLockLease<'_> {
        let mut map = self.map.lock().unwrap_or_else(PoisonError::into_inner);
        let lock = map.entry(id).or_default().clone();
        ItemLockLease { locks: self, id, lock }
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.map.lock().unwrap_or_else(PoisonError::into_inner).is_empty()
    }
}

/// A claim on one product's lock. Dropping the last claim removes the entry.
struct ItemLockLease<'a> {
    locks: &'a ItemLocks,
    id: i64,
    lock: Arc<Mutex<()>>,
}

impl Drop for ItemLockLease<'_> {
    fn drop(&mut self) {
        let mut map = self.locks.map.lock().unwrap_or_else(PoisonError::into_inner);
        // Clones are only handed out under the map lock: two refs means ours + the map's
        if Arc::strong_count(&self.lock) == 2 {
            map.remove(&self.id);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::MemoryProductStore;

    async fn service_with(products: &[(&str, i64, i64)]) -> WarehouseService<MemoryProductStore> {
        let service = WarehouseService::new(MemoryProductStore::new());
        for &(name, in_stock, reserved) in products {
            let created = service
                .add_product(NewProduct::new(name, in_stock))
                .await
                .unwrap();
            let id = created.model.unwrap().id;
            if reserved > 0 {
                let result = service
                    .order_item(QuantityUpdateRequest::new(id, reserved))
                    .await
                    .unwrap();
                assert!(result.success);
            }
        }
        service
    }

    async fn quantities(service: &WarehouseService<MemoryProductStore>, id: i64) -> (i64, i64) {
        let p = service.get_product(id).await.unwrap().unwrap();
        (p.in_stock_quantity, p.reserved_quantity)
    }

    // -------------------------------------------------------------------------
    // Order
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_order_within_stock() {
        let service = service_with(&[("Widget", 5, 3)]).await;

        let result = service.order_item(QuantityUpdateRequest::new(1, 2)).await.unwrap();

        assert_eq!(result, UpdateResult::ok());
        assert_eq!(quantities(&service, 1).await, (5, 5));
    }

    #[tokio::test]
    async fn test_order_beyond_stock_changes_nothing() {
        let service = service_with(&[("Widget", 5, 3)]).await;

        let result = service.order_item(QuantityUpdateRequest::new(1, 3)).await.unwrap();

        assert_eq!(result, UpdateResult::failed(ErrorReason::NotEnoughQuantity));
        assert_eq!(quantities(&service, 1).await, (5, 3));
    }

    // -------------------------------------------------------------------------
    // Ship
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_ship_reduces_both_counters() {
        let service = service_with(&[("Widget", 10, 4)]).await;

        let result = service.ship_item(QuantityUpdateRequest::new(1, 3)).await.unwrap();

        assert!(result.success);
        assert_eq!(quantities(&service, 1).await, (7, 1));
    }

    #[tokio::test]
    async fn test_ship_more_than_in_stock() {
        let service = service_with(&[("Widget", 2, 2)]).await;

        let result = service.ship_item(QuantityUpdateRequest::new(1, 5)).await.unwrap();

        assert_eq!(result.reason, Some(ErrorReason::NotEnoughQuantity));
        assert_eq!(quantities(&service, 1).await, (2, 2));
    }

    // -------------------------------------------------------------------------
    // Restock
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_restock_leaves_reservations() {
        let service = service_with(&[("Widget", 5, 2)]).await;

        let result = service.restock_item(QuantityUpdateRequest::new(1, 10)).await.unwrap();

        assert!(result.success);
        assert_eq!(quantities(&service, 1).await, (15, 2));
    }

    #[tokio::test]
    async fn test_restock_zero_is_a_no_op() {
        let service = service_with(&[("Widget", 5, 2)]).await;

        for _ in 0..2 {
            let result = service.restock_item(QuantityUpdateRequest::new(1, 0)).await.unwrap();
            assert!(result.success);
        }
        assert_eq!(quantities(&service, 1).await, (5, 2));
    }

    // -------------------------------------------------------------------------
    // Validation order
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_negative_amount_wins_over_unknown_id() {
        let service = service_with(&[]).await;

        for result in [
            service.order_item(QuantityUpdateRequest::new(42, -1)).await.unwrap(),
            service.ship_item(QuantityUpdateRequest::new(42, -1)).await.unwrap(),
            service.restock_item(QuantityUpdateRequest::new(42, -1)).await.unwrap(),
        ] {
            assert_eq!(result.reason, Some(ErrorReason::QuantityInvalid));
        }
    }

    #[tokio::test]
    async fn test_unknown_id_is_invalid_request() {
        let service = service_with(&[("Widget", 5, 0)]).await;

        let result = service.order_item(QuantityUpdateRequest::new(99, 1)).await.unwrap();

        assert_eq!(result, UpdateResult::failed(ErrorReason::InvalidRequest));
    }

    // -------------------------------------------------------------------------
    // Creation
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_add_resolves_name_collisions() {
        let service = service_with(&[("Widget", 1, 0)]).await;

        let first = service.add_product(NewProduct::new("Widget", 1)).await.unwrap();
        let second = service.add_product(NewProduct::new("Widget", 1)).await.unwrap();
        let trimmed = service.add_product(NewProduct::new("  Gadget  ", 1)).await.unwrap();

        assert_eq!(first.model.unwrap().name, "Widget(1)");
        assert_eq!(second.model.unwrap().name, "Widget(2)");
        assert_eq!(trimmed.model.unwrap().name, "Gadget");
    }

    #[tokio::test]
    async fn test_add_blank_name_creates_nothing() {
        let service = service_with(&[]).await;

        let result = service.add_product(NewProduct::new("   ", 5)).await.unwrap();

        assert!(!result.success);
        assert!(result.model.is_none());
        assert_eq!(result.reason, Some(ErrorReason::InvalidRequest));
        assert_eq!(service.store().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_add_accepts_long_names() {
        let service = service_with(&[]).await;
        let long = "A".repeat(201);
        let at_limit = "B".repeat(200);

        let created = service.add_product(NewProduct::new(long.clone(), 1)).await.unwrap();
        service.add_product(NewProduct::new(at_limit.clone(), 1)).await.unwrap();
        let duplicate = service.add_product(NewProduct::new(at_limit.clone(), 1)).await.unwrap();

        assert_eq!(created.model.unwrap().name, long);
        assert_eq!(duplicate.model.unwrap().name, format!("{at_limit}(1)"));
    }

    #[tokio::test]
    async fn test_add_negative_stock_checked_before_name() {
        let service = service_with(&[]).await;

        let result = service.add_product(NewProduct::new("", -1)).await.unwrap();

        assert_eq!(result.reason, Some(ErrorReason::QuantityInvalid));
    }

    #[tokio::test]
    async fn test_add_ignores_requested_reservation() {
        let service = service_with(&[]).await;
        let request = NewProduct {
            id: Some(77),
            reserved_quantity: 4,
            ..NewProduct::new("Widget", 5)
        };

        let product = service.add_product(request).await.unwrap().model.unwrap();

        assert_eq!(product.id, 1);
        assert_eq!(product.reserved_quantity, 0);
    }

    // -------------------------------------------------------------------------
    // Listing
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_in_stock_listing() {
        let service = service_with(&[("Full", 5, 5), ("Open", 5, 3), ("Empty", 0, 0)]).await;

        let names: Vec<_> = service
            .in_stock_products()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();

        assert_eq!(names, vec!["Open"]);
    }

    // -------------------------------------------------------------------------
    // Concurrency
    // -------------------------------------------------------------------------

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_orders_never_over_reserve() {
        let service = Arc::new(service_with(&[("Widget", 10, 0)]).await);

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    service.order_item(QuantityUpdateRequest::new(1, 1)).await.unwrap()
                })
            })
            .collect();

        let mut succeeded = 0;
        for handle in handles {
            if handle.await.unwrap().success {
                succeeded += 1;
            }
        }

        assert_eq!(succeeded, 10);
        assert_eq!(quantities(&service, 1).await, (10, 10));
    }

    #[tokio::test]
    async fn test_item_locks_are_released() {
        let service = service_with(&[("Widget", 5, 0)]).await;

        service.order_item(QuantityUpdateRequest::new(1, 1)).await.unwrap();
        service.order_item(QuantityUpdateRequest::new(99, 1)).await.unwrap();

        assert!(service.item_locks.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_waiter_releases_item_lock() {
        let service = Arc::new(service_with(&[]).await);

        let holder = service.item_locks.lease(777);
        let held = holder.lock.lock().await;

        let waiter = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.order_item(QuantityUpdateRequest::new(777, 1)).await })
        };
        // Let the waiter register and park on the held lock
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        assert!(!waiter.is_finished());

        drop(held);
        drop(holder);
        assert!(!service.item_locks.is_empty());

        waiter.abort();
        let _ = waiter.await;

        assert!(service.item_locks.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_get_distinct_names() {
        let service = Arc::new(service_with(&[]).await);

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    service.add_product(NewProduct::new("Widget", 1)).await.unwrap()
                })
            })
            .collect();

        let mut names = Vec::new();
        for handle in handles {
            names.push(handle.await.unwrap().model.unwrap().name);
        }
        names.sort();

        assert_eq!(
            names,
            vec!["Widget", "Widget(1)", "Widget(2)", "Widget(3)", "Widget(4)"]
        );
    }

    #[tokio::test]
    async fn test_sqlite_backed_service() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = WarehouseService::new(db.products());

        let product = service
            .add_product(NewProduct::new("Widget", 5))
            .await
            .unwrap()
            .model
            .unwrap();
        service.order_item(QuantityUpdateRequest::new(product.id, 3)).await.unwrap();
        service.ship_item(QuantityUpdateRequest::new(product.id, 1)).await.unwrap();

        let stored = service.get_product(product.id).await.unwrap().unwrap();
        assert_eq!((stored.in_stock_quantity, stored.reserved_quantity), (4, 2));
        assert_eq!(stored.version, 2);
    }

    #[tokio::test]
    async fn test_store_fault_is_an_error_not_a_reason() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = WarehouseService::new(db.products());
        db.close().await;

        let err = service
            .order_item(QuantityUpdateRequest::new(1, 1))
            .await
            .unwrap_err();

        assert!(err.is_unavailable());
    }
}
