//! # Warehouse Routes
//!
//! HTTP handlers. Each one unpacks the request, calls the service and
//! wraps the outcome; no business rule lives here.
//!
//! | Method | Path                        | Body                  | Response               |
//! |--------|-----------------------------|-----------------------|------------------------|
//! | GET    | `/api/warehouse`            |                       | `Product[]`            |
//! | GET    | `/api/warehouse/{id}`       |                       | `Product` or 404       |
//! | GET    | `/api/warehouse/InStock`    |                       | `Product[]`            |
//! | POST   | `/api/warehouse/orderItem`  | `QuantityUpdateRequest` | `UpdateResult`       |
//! | POST   | `/api/warehouse/shipItem`   | `QuantityUpdateRequest` | `UpdateResult`       |
//! | POST   | `/api/warehouse/restock`    | `QuantityUpdateRequest` | `UpdateResult`       |
//! | POST   | `/api/warehouse/add`        | `NewProduct`          | `CreateResult<Product>`|
//! | GET    | `/health`                   |                       | `"OK"` or 503          |

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use tracing::{debug, warn};

use warehouse_core::{CreateResult, NewProduct, Product, QuantityUpdateRequest, UpdateResult};

use crate::error::ApiError;
use crate::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

// =============================================================================
// Reads
// =============================================================================

pub async fn list_products(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Product>> {
    let products = state.service.list_products().await?;
    debug!(count = products.len(), "GET /api/warehouse");
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Product> {
    match state.service.get_product(id).await? {
        Some(product) => Ok(Json(product)),
        None => Err(ApiError::not_found("Product", id)),
    }
}

pub async fn in_stock_products(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Product>> {
    Ok(Json(state.service.in_stock_products().await?))
}

// =============================================================================
// Transitions
// =============================================================================

pub async fn order_item(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QuantityUpdateRequest>,
) -> ApiResult<UpdateResult> {
    Ok(Json(state.service.order_item(request).await?))
}

pub async fn ship_item(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QuantityUpdateRequest>,
) -> ApiResult<UpdateResult> {
    Ok(Json(state.service.ship_item(request).await?))
}

pub async fn restock_item(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QuantityUpdateRequest>,
) -> ApiResult<UpdateResult> {
    Ok(Json(state.service.restock_item(request).await?))
}

// =============================================================================
// Creation
// =============================================================================

pub async fn add_product(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewProduct>,
) -> ApiResult<CreateResult<Product>> {
    Ok(Json(state.service.add_product(request).await?))
}

// =============================================================================
// Health
// =============================================================================

/// Liveness plus store reachability.
pub async fn health(State(state): State<Arc<AppState>>) -> Result<&'static str, ApiError> {
    if state.is_store_healthy().await {
        Ok("OK")
    } else {
        warn!("Health check failed: store unreachable");
        Err(ApiError::unavailable("Database unavailable"))
    }
}
