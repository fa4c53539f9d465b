//! # Quantity Transition Engine
//!
//! Order, ship and restock a single product's stock counters.
//!
//! ## Validate-Then-Apply
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Transition, All Or Nothing                       │
//! │                                                                         │
//! │  amount < 0 ? ───────────────────────────────► QuantityInvalid         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  tentative = transform(current, amount)                                │
//! │       │        (overflow ───────────────────► QuantityInvalid)         │
//! │       ▼                                                                 │
//! │  rule(current, amount, tentative) ?                                    │
//! │  0 <= reserved <= in stock ?  ── no ────────► NotEnoughQuantity        │
//! │       │                                                                 │
//! │       ▼ yes                                                             │
//! │  new Product (the input is never touched)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! | Transition | Effect                                            | Rule                    |
//! |------------|---------------------------------------------------|-------------------------|
//! | Order      | reserved += amount                                | reserved' <= in stock   |
//! | Ship       | reserved = max(reserved - amount, 0); in stock -= amount | in stock >= amount |
//! | Restock    | in stock += amount                                | none                    |

use std::fmt;

use crate::error::{CoreResult, ErrorReason};
use crate::types::Product;
use crate::validation::validate_quantity;

// =============================================================================
// Transition
// =============================================================================

/// The three legal ways to change a product's quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Reserve stock for a future shipment.
    Order,
    /// Fulfill: remove units from both reserved and in stock.
    Ship,
    /// Receive new physical stock.
    Restock,
}

impl Transition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transition::Order => "order",
            Transition::Ship => "ship",
            Transition::Restock => "restock",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Quantities
// =============================================================================

/// The two counters a transition reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantities {
    pub in_stock: i64,
    pub reserved: i64,
}

impl Quantities {
    pub fn of(product: &Product) -> Self {
        Quantities {
            in_stock: product.in_stock_quantity,
            reserved: product.reserved_quantity,
        }
    }

    /// `0 <= reserved <= in_stock`
    #[inline]
    pub fn is_consistent(&self) -> bool {
        0 <= self.reserved && self.reserved <= self.in_stock
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Applies `transition` to `product` and returns the new product state.
///
/// The input product is left untouched; on error no new state exists, so a
/// rejected transition can never be half-applied.
///
/// ## Errors
/// - [`ErrorReason::QuantityInvalid`] - `amount` is negative or overflows
/// - [`ErrorReason::NotEnoughQuantity`] - the stock rule would be broken
pub fn apply(transition: Transition, product: &Product, amount: i64) -> CoreResult<Product> {
    match transition {
        Transition::Order => validate_then_apply(product, amount, reserve, |_, _, next| {
            next.reserved <= next.in_stock
        }),
        Transition::Ship => validate_then_apply(product, amount, fulfill, |current, amount, _| {
            current.in_stock >= amount
        }),
        Transition::Restock => validate_then_apply(product, amount, replenish, |_, _, _| true),
    }
}

/// Shorthand for [`apply`] with [`Transition::Order`].
pub fn order_item(product: &Product, amount: i64) -> CoreResult<Product> {
    apply(Transition::Order, product, amount)
}

/// Shorthand for [`apply`] with [`Transition::Ship`].
pub fn ship_item(product: &Product, amount: i64) -> CoreResult<Product> {
    apply(Transition::Ship, product, amount)
}

/// Shorthand for [`apply`] with [`Transition::Restock`].
pub fn restock_item(product: &Product, amount: i64) -> CoreResult<Product> {
    apply(Transition::Restock, product, amount)
}

/// Generic transition: sign check, tentative state, rule, commit.
///
/// `transform` returns `None` when the arithmetic overflows. `rule` sees the
/// current state, the amount and the tentative state, so it can check
/// conditions the flooring in `transform` would otherwise hide.
fn validate_then_apply<T, R>(
    product: &Product,
    amount: i64,
    transform: T,
    rule: R,
) -> CoreResult<Product>
where
    T: FnOnce(Quantities, i64) -> Option<Quantities>,
    R: FnOnce(Quantities, i64, Quantities) -> bool,
{
    validate_quantity(amount)?;

    let current = Quantities::of(product);
    let next = transform(current, amount).ok_or(ErrorReason::QuantityInvalid)?;

    if !rule(current, amount, next) || !next.is_consistent() {
        return Err(ErrorReason::NotEnoughQuantity);
    }

    Ok(Product {
        in_stock_quantity: next.in_stock,
        reserved_quantity: next.reserved,
        ..product.clone()
    })
}

fn reserve(current: Quantities, amount: i64) -> Option<Quantities> {
    Some(Quantities {
        reserved: current.reserved.checked_add(amount)?,
        ..current
    })
}

fn fulfill(current: Quantities, amount: i64) -> Option<Quantities> {
    Some(Quantities {
        in_stock: current.in_stock.saturating_sub(amount).max(0),
        reserved: current.reserved.saturating_sub(amount).max(0),
    })
}

fn replenish(current: Quantities, amount: i64) -> Option<Quantities> {
    Some(Quantities {
        in_stock: current.in_stock.checked_add(amount)?,
        ..current
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(in_stock: i64, reserved: i64) -> Product {
        Product::new(1, "Widget", in_stock).with_reserved(reserved)
    }

    #[test]
    fn test_order_reserves_within_stock() {
        let p = product(5, 3);

        let next = order_item(&p, 2).unwrap();
        assert_eq!(next.reserved_quantity, 5);
        assert_eq!(next.in_stock_quantity, 5);
    }

    #[test]
    fn test_order_beyond_stock_is_rejected() {
        let p = product(5, 3);

        assert_eq!(order_item(&p, 3), Err(ErrorReason::NotEnoughQuantity));
        assert_eq!(p, product(5, 3));
    }

    #[test]
    fn test_ship_reduces_both_counters() {
        let next = ship_item(&product(10, 4), 3).unwrap();
        assert_eq!(next.reserved_quantity, 1);
        assert_eq!(next.in_stock_quantity, 7);
    }

    #[test]
    fn test_ship_floors_reserved_at_zero() {
        let next = ship_item(&product(10, 2), 5).unwrap();
        assert_eq!(next.reserved_quantity, 0);
        assert_eq!(next.in_stock_quantity, 5);
    }

    #[test]
    fn test_ship_more_than_in_stock_is_rejected() {
        assert_eq!(
            ship_item(&product(2, 2), 5),
            Err(ErrorReason::NotEnoughQuantity)
        );
    }

    #[test]
    fn test_ship_entire_stock() {
        let next = ship_item(&product(4, 4), 4).unwrap();
        assert_eq!(Quantities::of(&next), Quantities { in_stock: 0, reserved: 0 });
    }

    #[test]
    fn test_restock_leaves_reserved_alone() {
        let next = restock_item(&product(5, 2), 10).unwrap();
        assert_eq!(next.in_stock_quantity, 15);
        assert_eq!(next.reserved_quantity, 2);
    }

    #[test]
    fn test_restock_zero_is_idempotent() {
        let p = product(5, 2);
        let mut current = p.clone();
        for _ in 0..3 {
            current = restock_item(&current, 0).unwrap();
        }
        assert_eq!(current, p);
    }

    #[test]
    fn test_negative_amount_is_invalid_for_every_transition() {
        let p = product(10, 0);
        for transition in [Transition::Order, Transition::Ship, Transition::Restock] {
            assert_eq!(
                apply(transition, &p, -1),
                Err(ErrorReason::QuantityInvalid),
                "{transition}"
            );
        }
    }

    #[test]
    fn test_overflow_is_rejected_not_wrapped() {
        let p = product(i64::MAX, 0);
        assert_eq!(restock_item(&p, 1), Err(ErrorReason::QuantityInvalid));

        let p = product(i64::MAX, i64::MAX);
        assert_eq!(order_item(&p, 1), Err(ErrorReason::QuantityInvalid));
    }

    #[test]
    fn test_invariant_holds_over_a_sequence() {
        let steps = [
            (Transition::Restock, 10),
            (Transition::Order, 4),
            (Transition::Order, 7),
            (Transition::Ship, 3),
            (Transition::Order, 6),
            (Transition::Ship, 20),
            (Transition::Ship, 5),
            (Transition::Order, 3),
            (Transition::Restock, 0),
        ];

        let mut current = product(0, 0);
        for (transition, amount) in steps {
            if let Ok(next) = apply(transition, &current, amount) {
                current = next;
            }
            assert!(Quantities::of(&current).is_consistent(), "{current:?}");
        }

        assert_eq!(Quantities::of(&current), Quantities { in_stock: 2, reserved: 2 });
    }

    #[test]
    fn test_transition_keeps_identity() {
        let mut p = product(5, 0);
        p.id = 42;
        p.version = 9;

        let next = order_item(&p, 1).unwrap();
        assert_eq!(next.id, 42);
        assert_eq!(next.name, "Widget");
        assert_eq!(next.version, 9);
    }
}
