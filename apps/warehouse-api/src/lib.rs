//! # warehouse-api
//!
//! HTTP front end for the warehouse catalog.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Warehouse API Server                             │
//! │                                                                         │
//! │  Client ───► axum Router ───► routes.rs ───► WarehouseService          │
//! │                                                   │                     │
//! │                                                   ▼                     │
//! │                                             CatalogStore                │
//! │                                        (SQLite or in-memory)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tracing::info;

use warehouse_db::{CatalogStore, Database, DbConfig, DbResult, MemoryProductStore, WarehouseService};

use crate::config::{DatabaseSettings, StorageKind};

/// Shared application state.
pub struct AppState {
    pub service: WarehouseService<CatalogStore>,

    /// The SQLite pool, kept for health checks and shutdown. `None` for
    /// in-memory storage.
    pub database: Option<Database>,
}

impl AppState {
    /// Opens the configured store and wraps it in a service.
    pub async fn open(settings: &DatabaseSettings) -> DbResult<Self> {
        match settings.storage {
            StorageKind::Sqlite => {
                if let Some(parent) = settings.path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent).map_err(|e| {
                            warehouse_db::DbError::ConnectionFailed(format!(
                                "cannot create {}: {e}",
                                parent.display()
                            ))
                        })?;
                    }
                }

                let config =
                    DbConfig::new(&settings.path).max_connections(settings.max_connections);
                let db = Database::new(config).await?;
                Ok(AppState::sqlite(db))
            }
            StorageKind::Memory => {
                info!("Using in-memory storage; data is lost on shutdown");
                Ok(AppState::memory(MemoryProductStore::new()))
            }
        }
    }

    pub fn sqlite(db: Database) -> Self {
        AppState {
            service: WarehouseService::new(CatalogStore::from(db.products())),
            database: Some(db),
        }
    }

    pub fn memory(store: MemoryProductStore) -> Self {
        AppState {
            service: WarehouseService::new(CatalogStore::from(store)),
            database: None,
        }
    }

    pub async fn is_store_healthy(&self) -> bool {
        match &self.database {
            Some(db) => db.health_check().await,
            None => true,
        }
    }

    pub async fn close(&self) {
        if let Some(db) = &self.database {
            db.close().await;
        }
    }
}

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/api/warehouse", get(routes::list_products))
        .route("/api/warehouse/InStock", get(routes::in_stock_products))
        .route("/api/warehouse/{id}", get(routes::get_product))
        .route("/api/warehouse/orderItem", post(routes::order_item))
        .route("/api/warehouse/shipItem", post(routes::ship_item))
        .route("/api/warehouse/restock", post(routes::restock_item))
        .route("/api/warehouse/add", post(routes::add_product))
        .with_state(state)
}
