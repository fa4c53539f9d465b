//! # warehouse-core: Pure Business Logic for the Warehouse Catalog
//!
//! This crate holds the two pieces of the catalog that carry real invariants:
//! the quantity transition engine and the unique product-name resolver. Both
//! are pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Warehouse Catalog Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 warehouse-api (axum handlers)                   │   │
//! │  │   /orderItem  /shipItem  /restock  /add  /InStock  /{id}        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        warehouse-db (WarehouseService + ProductStore)           │   │
//! │  │        load ──► engine/resolver ──► compare-and-swap write      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ warehouse-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ inventory │  │  naming   │  │ validation│  │   │
//! │  │   │  Product  │  │  Order    │  │  Widget   │  │  quantity │  │   │
//! │  │   │  Results  │  │  Ship     │  │  Widget(1)│  │  name     │  │   │
//! │  │   │           │  │  Restock  │  │  Widget(2)│  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire and domain types (Product, UpdateResult, CreateResult)
//! - [`error`] - Business outcome and validation error types
//! - [`validation`] - Request validation
//! - [`inventory`] - Order / ship / restock transitions
//! - [`naming`] - Windows-style unique name resolution
//!
//! ## Example Usage
//!
//! ```rust
//! use warehouse_core::inventory::{apply, Transition};
//! use warehouse_core::{ErrorReason, Product};
//!
//! let product = Product::new(1, "Widget", 5).with_reserved(3);
//!
//! let reserved = apply(Transition::Order, &product, 2).unwrap();
//! assert_eq!(reserved.reserved_quantity, 5);
//!
//! let rejected = apply(Transition::Order, &product, 3);
//! assert_eq!(rejected, Err(ErrorReason::NotEnoughQuantity));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod inventory;
pub mod naming;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreResult, ErrorReason, ValidationError};
pub use types::*;
