//! # Product Repository
//!
//! SQLite-backed [`ProductStore`].
//!
//! ## Compare-and-Swap Update
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Versioned Quantity Write                             │
//! │                                                                         │
//! │  Service read:  id=1, in_stock=5, reserved=3, version=7                │
//! │       │                                                                 │
//! │       ▼  apply(Order, 2) → in_stock=5, reserved=5                      │
//! │                                                                         │
//! │  UPDATE products                                                       │
//! │     SET in_stock_quantity = 5, reserved_quantity = 5,                  │
//! │         version = version + 1                                          │
//! │   WHERE id = 1 AND version = 7                                         │
//! │       │                                                                 │
//! │       ├── 1 row  → Committed (version is now 8)                        │
//! │       └── 0 rows → Conflict  (someone else wrote first)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{ProductStore, WriteOutcome};
use warehouse_core::Product;

const SELECT_PRODUCT: &str = r#"
    SELECT
        id,
        name,
        in_stock_quantity,
        reserved_quantity,
        version
    FROM products
"#;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let product = repo.insert("Widget", 5).await?;
/// let fetched = repo.get(product.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }
}

impl ProductStore for ProductRepository {
    async fn list(&self) -> DbResult<Vec<Product>> {
        let sql = format!("{SELECT_PRODUCT} ORDER BY id");
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    async fn get(&self, id: i64) -> DbResult<Option<Product>> {
        let sql = format!("{SELECT_PRODUCT} WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    async fn names(&self) -> DbResult<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>("SELECT name FROM products")
            .fetch_all(&self.pool)
            .await?;

        Ok(names)
    }

    /// Inserts a new product.
    ///
    /// ## Errors
    /// The `UNIQUE` constraint on `name` surfaces as
    /// [`DbError::UniqueViolation`] carrying the rejected name.
    async fn insert(&self, name: &str, in_stock_quantity: i64) -> DbResult<Product> {
        let now = Utc::now().to_rfc3339();

        debug!(name = %name, in_stock = in_stock_quantity, "Inserting product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                name, in_stock_quantity, reserved_quantity, version,
                created_at, updated_at
            ) VALUES (?1, ?2, 0, 0, ?3, ?3)
            "#,
        )
        .bind(name)
        .bind(in_stock_quantity)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, name),
            other => other,
        })?;

        let id = result.last_insert_rowid();

        Ok(Product {
            id,
            name: name.to_string(),
            in_stock_quantity,
            reserved_quantity: 0,
            version: 0,
        })
    }

    async fn update_quantities(&self, product: &Product) -> DbResult<WriteOutcome> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                in_stock_quantity = ?1,
                reserved_quantity = ?2,
                version = version + 1,
                updated_at = ?3
            WHERE id = ?4 AND version = ?5
            "#,
        )
        .bind(product.in_stock_quantity)
        .bind(product.reserved_quantity)
        .bind(&now)
        .bind(product.id)
        .bind(product.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            debug!(id = product.id, version = product.version, "Stale quantity write");
            return Ok(WriteOutcome::Conflict);
        }

        Ok(WriteOutcome::Committed)
    }

    async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
