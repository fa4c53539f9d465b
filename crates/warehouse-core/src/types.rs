//! # Domain Types
//!
//! Core domain and wire types used throughout the warehouse catalog.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐   ┌──────────────────────┐                   │
//! │  │      Product         │   │ QuantityUpdateRequest│                   │
//! │  │  ──────────────────  │   │  ──────────────────  │                   │
//! │  │  id (store-assigned) │   │  id                  │                   │
//! │  │  name (unique)       │   │  quantity            │                   │
//! │  │  inStockQuantity     │   └──────────────────────┘                   │
//! │  │  reservedQuantity    │                                              │
//! │  │  version (internal)  │   ┌──────────────────────┐                   │
//! │  └──────────────────────┘   │     NewProduct       │                   │
//! │                             │  name, inStock       │                   │
//! │  ┌──────────────────────┐   └──────────────────────┘                   │
//! │  │ UpdateResult         │                                              │
//! │  │ CreateResult<T>      │   success + optional ErrorReason             │
//! │  └──────────────────────┘                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All wire types serialize with camelCase field names.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ErrorReason};

// =============================================================================
// Product
// =============================================================================

/// A catalog entry with its two stock counters.
///
/// ## Invariant
/// `0 <= reserved_quantity <= in_stock_quantity` after every successful
/// transition. Only [`crate::inventory`] produces new quantity states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Identifier assigned by the store on insert.
    pub id: i64,

    /// Unique, trimmed display name.
    pub name: String,

    /// Units physically available.
    pub in_stock_quantity: i64,

    /// Units committed to future shipment.
    pub reserved_quantity: i64,

    /// Write counter for compare-and-swap updates. Never leaves the server.
    #[serde(skip)]
    pub version: i64,
}

impl Product {
    /// Creates a product with nothing reserved.
    pub fn new(id: i64, name: impl Into<String>, in_stock_quantity: i64) -> Self {
        Product {
            id,
            name: name.into(),
            in_stock_quantity,
            reserved_quantity: 0,
            version: 0,
        }
    }

    /// Sets the reserved quantity (test and seeding helper).
    pub fn with_reserved(mut self, reserved_quantity: i64) -> Self {
        self.reserved_quantity = reserved_quantity;
        self
    }

    /// Checks the public "in stock" rule.
    ///
    /// In stock means in-stock quantity is greater than zero and greater
    /// than the reserved quantity.
    #[inline]
    pub fn is_in_stock(&self) -> bool {
        self.in_stock_quantity > 0 && self.in_stock_quantity > self.reserved_quantity
    }
}

// =============================================================================
// Requests
// =============================================================================

/// Body of the order / ship / restock endpoints.
///
/// ```json
/// { "id": 1, "quantity": 1 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QuantityUpdateRequest {
    pub id: i64,
    pub quantity: i64,
}

impl QuantityUpdateRequest {
    pub fn new(id: i64, quantity: i64) -> Self {
        QuantityUpdateRequest { id, quantity }
    }
}

/// Body of the add-product endpoint.
///
/// `id` and `reservedQuantity` are accepted for compatibility with clients
/// that post a whole product, but both are ignored: the store assigns the id
/// and new products never start with a reservation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewProduct {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub in_stock_quantity: i64,

    #[serde(default)]
    pub reserved_quantity: i64,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, in_stock_quantity: i64) -> Self {
        NewProduct {
            name: name.into(),
            in_stock_quantity,
            ..Default::default()
        }
    }
}

// =============================================================================
// Results
// =============================================================================

/// Outcome of a quantity transition.
///
/// ```json
/// { "success": false, "reason": "NotEnoughQuantity" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateResult {
    pub success: bool,
    pub reason: Option<ErrorReason>,
}

impl UpdateResult {
    pub fn ok() -> Self {
        UpdateResult {
            success: true,
            reason: None,
        }
    }

    pub fn failed(reason: ErrorReason) -> Self {
        UpdateResult {
            success: false,
            reason: Some(reason),
        }
    }
}

impl<T> From<CoreResult<T>> for UpdateResult {
    fn from(result: CoreResult<T>) -> Self {
        match result {
            Ok(_) => UpdateResult::ok(),
            Err(reason) => UpdateResult::failed(reason),
        }
    }
}

/// Outcome of a creation. `model` is `None` whenever `success` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateResult<T> {
    pub success: bool,
    pub model: Option<T>,
    pub reason: Option<ErrorReason>,
}

impl<T> CreateResult<T> {
    pub fn created(model: T) -> Self {
        CreateResult {
            success: true,
            model: Some(model),
            reason: None,
        }
    }

    pub fn failed(reason: ErrorReason) -> Self {
        CreateResult {
            success: false,
            model: None,
            reason: Some(reason),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_stock_rule() {
        assert!(!Product::new(1, "A", 5).with_reserved(5).is_in_stock());
        assert!(Product::new(2, "B", 5).with_reserved(3).is_in_stock());
        assert!(!Product::new(3, "C", 0).is_in_stock());
    }

    #[test]
    fn test_product_json_shape() {
        let product = Product::new(7, "Widget", 10).with_reserved(4);
        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "name": "Widget",
                "inStockQuantity": 10,
                "reservedQuantity": 4
            })
        );
    }

    #[test]
    fn test_new_product_ignores_missing_fields() {
        let parsed: NewProduct = serde_json::from_str(r#"{ "name": "Gadget" }"#).unwrap();
        assert_eq!(parsed.name, "Gadget");
        assert_eq!(parsed.in_stock_quantity, 0);
        assert_eq!(parsed.id, None);
    }

    #[test]
    fn test_update_result_from_core_result() {
        let ok: UpdateResult = Ok::<(), ErrorReason>(()).into();
        assert_eq!(ok, UpdateResult::ok());

        let failed: UpdateResult = Err::<(), _>(ErrorReason::InvalidRequest).into();
        assert!(!failed.success);
        assert_eq!(failed.reason, Some(ErrorReason::InvalidRequest));
    }

    #[test]
    fn test_failed_create_result_has_no_model() {
        let result: CreateResult<Product> = CreateResult::failed(ErrorReason::QuantityInvalid);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["success"], false);
        assert!(json["model"].is_null());
        assert_eq!(json["reason"], "QuantityInvalid");
    }
}
