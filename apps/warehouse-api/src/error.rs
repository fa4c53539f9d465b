//! # API Error Type
//!
//! Infrastructure failures as seen by HTTP clients.
//!
//! ## Two Kinds of Failure
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Warehouse API                      │
//! │                                                                         │
//! │  POST /api/warehouse/orderItem                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  WarehouseService::order_item                                          │
//! │         │                                                               │
//! │         ├── Ok(UpdateResult { success: false, reason }) ──► 200 + body │
//! │         │      business rejection, part of the normal contract         │
//! │         │                                                               │
//! │         └── Err(DbError) ──► ApiError ──► 500 / 503 + { code, message }│
//! │                store fault, detail logged, generic message returned    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;
use warehouse_db::DbError;

/// Error body returned for non-business failures.
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: 42"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Store failed to execute an operation (500)
    DatabaseError,

    /// Store unreachable (503)
    ServiceUnavailable,

    /// Anything else (500)
    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{resource} not found: {id}"))
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ServiceUnavailable, message)
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

/// Converts database errors to API errors.
///
/// The underlying error is logged; clients only see a generic message.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            DbError::ConnectionFailed(e) => {
                error!("Database connection failed: {}", e);
                ApiError::unavailable("Database unavailable")
            }
            DbError::PoolExhausted => {
                error!("Database pool exhausted");
                ApiError::unavailable("Database busy")
            }
            DbError::UniqueViolation { field, value } => {
                error!("Unresolved duplicate {}: {}", field, value);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::MigrationFailed(e) => {
                error!("Migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::Internal(e) => {
                error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::Internal, "Internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_maps_to_503() {
        let err = ApiError::from(DbError::ConnectionFailed("Pool is closed".into()));
        assert_eq!(err.code, ErrorCode::ServiceUnavailable);
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(!err.message.contains("Pool"));
    }

    #[test]
    fn test_query_failure_maps_to_500() {
        let err = ApiError::from(DbError::QueryFailed("no such table".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Database operation failed");
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(ApiError::not_found("Product", 42)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "code": "NOT_FOUND", "message": "Product not found: 42" })
        );
    }
}
