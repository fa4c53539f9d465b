//! # warehouse-db: Storage Layer for the Warehouse Catalog
//!
//! Product persistence and the service that drives every catalog operation.
//! SQLite via sqlx for real deployments, an in-memory store for tests.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Warehouse Catalog Data Flow                        │
//! │                                                                         │
//! │  HTTP handler (POST /api/warehouse/orderItem)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   warehouse-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ Warehouse     │    │  Stores       │    │  Database    │  │   │
//! │  │   │ Service       │───►│ (repository)  │───►│  (pool.rs)   │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ locks + CAS   │    │ ProductRepo   │    │ SqlitePool   │  │   │
//! │  │   │ retry         │    │ MemoryStore   │    │ Migrations   │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │          │                                                     │   │
//! │  │          ▼ pure rules from warehouse-core                      │   │
//! │  │   inventory::apply  ·  naming::resolve_unique_name             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - The `ProductStore` trait and its implementations
//! - [`service`] - `WarehouseService`, the catalog facade
//!
//! ## Usage
//!
//! ```rust,ignore
//! use warehouse_db::{Database, DbConfig, WarehouseService};
//!
//! let db = Database::new(DbConfig::new("warehouse.db")).await?;
//! let service = WarehouseService::new(db.products());
//!
//! let in_stock = service.in_stock_products().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::{CatalogStore, MemoryProductStore, ProductRepository, ProductStore, WriteOutcome};
pub use service::{WarehouseService, MAX_WRITE_ATTEMPTS};
