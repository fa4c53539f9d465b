//! # Validation Module
//!
//! Input validation for the warehouse catalog.
//!
//! ## Validation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Check Order (fixed)                                │
//! │                                                                         │
//! │  1. Quantity sign   ── negative? ──► QuantityInvalid                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  2. Existence       ── missing?  ──► InvalidRequest   (service layer)  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  3. Invariant       ── broken?   ──► NotEnoughQuantity (inventory)     │
//! │                                                                         │
//! │  A negative amount against an unknown id always reports               │
//! │  QuantityInvalid, never InvalidRequest.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use warehouse_core::validation::{validate_product_name, validate_quantity};
//!
//! assert!(validate_quantity(0).is_ok());
//! assert!(validate_quantity(-1).is_err());
//!
//! assert_eq!(validate_product_name("  Gadget  ").unwrap(), "Gadget");
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a requested quantity.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (a no-op transition)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    check_non_negative("quantity", qty)
}

/// Validates the initial in-stock quantity of a new product.
pub fn validate_in_stock_quantity(qty: i64) -> ValidationResult<()> {
    check_non_negative("inStockQuantity", qty)
}

fn check_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::NegativeQuantity {
            field: field.to_string(),
            value,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name and returns its trimmed form.
///
/// ## Rules
/// - Leading and trailing whitespace is removed
/// - Must not be empty after trimming
/// - No upper bound on length
pub fn validate_product_name(name: &str) -> ValidationResult<&str> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    Ok(name)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(0).is_ok());
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(i64::MAX).is_ok());

        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(i64::MIN).is_err());
    }

    #[test]
    fn test_validate_in_stock_quantity_names_field() {
        let err = validate_in_stock_quantity(-3).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NegativeQuantity {
                field: "inStockQuantity".to_string(),
                value: -3,
            }
        );
    }

    #[test]
    fn test_validate_product_name() {
        assert_eq!(validate_product_name("Widget").unwrap(), "Widget");
        assert_eq!(validate_product_name("  Gadget  ").unwrap(), "Gadget");
        assert_eq!(validate_product_name("\tBolt (M6)\n").unwrap(), "Bolt (M6)");

        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
    }

    #[test]
    fn test_long_names_are_accepted() {
        let long = "A".repeat(1_000);
        assert_eq!(validate_product_name(&long).unwrap(), long);
    }
}
