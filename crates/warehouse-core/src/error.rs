//! # Error Types
//!
//! Business outcome and validation error types for warehouse-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  warehouse-core errors (this file)                                     │
//! │  ├── ErrorReason      - Business rejections (returned in payloads)     │
//! │  └── ValidationError  - Field-level input failures                     │
//! │                                                                         │
//! │  warehouse-db errors (separate crate)                                  │
//! │  └── DbError          - Storage faults (never an ErrorReason)          │
//! │                                                                         │
//! │  warehouse-api errors (in app)                                         │
//! │  └── ApiError         - What HTTP clients see on a 5xx                 │
//! │                                                                         │
//! │  Flow: ValidationError → ErrorReason → UpdateResult / CreateResult     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Business rejections are values, never panics
//! 3. Storage faults live in a different type so callers can't confuse them

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Error Reason
// =============================================================================

/// Why a quantity transition or product creation was rejected.
///
/// Serialized by variant name (`"NotEnoughQuantity"`) inside
/// [`UpdateResult`](crate::UpdateResult) and
/// [`CreateResult`](crate::CreateResult).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ErrorReason {
    /// The referenced product does not exist, or the name is blank.
    #[error("invalid request")]
    InvalidRequest,

    /// The requested amount is negative.
    #[error("quantity must not be negative")]
    QuantityInvalid,

    /// The transition would break `0 <= reserved <= in stock`.
    ///
    /// ## When This Occurs
    /// ```text
    /// in stock 5, reserved 3
    ///      │
    ///      ▼
    /// order 3 → reserved would be 6 > 5
    ///      │
    ///      ▼
    /// NotEnoughQuantity (product left untouched)
    /// ```
    #[error("not enough quantity")]
    NotEnoughQuantity,
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These carry the offending field for logging; clients only ever see the
/// [`ErrorReason`] they convert into.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// A quantity was negative.
    #[error("{field} must not be negative (got {value})")]
    NegativeQuantity { field: String, value: i64 },
}

impl From<ValidationError> for ErrorReason {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Required { .. } => ErrorReason::InvalidRequest,
            ValidationError::NegativeQuantity { .. } => ErrorReason::QuantityInvalid,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with ErrorReason.
pub type CoreResult<T> = Result<T, ErrorReason>;

// =============================================================================
// Unit Tests
// =============================================================================
