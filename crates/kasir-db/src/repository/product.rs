//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Name filter (case-insensitive substring)
//! - CRUD operations
//!
//! Stock is decremented only by the [`InventoryLedger`](crate::InventoryLedger)
//! during checkout; `update` here is the administrative overwrite.
//!
//! ## Name Filter
//! ```text
//! GET /api/product?name=teh
//!       │
//!       ▼
//! p.name LIKE '%teh%' ESCAPE '\'      (ASCII case-insensitive in SQLite)
//!       │
//!       ▼
//! ┌─────────────────────────────────────────┐
//! │ 3 | Es Teh Manis   | Minuman | 5000     │ ← MATCH
//! │ 4 | Teh Tarik      | Minuman | 8000     │ ← MATCH
//! │ 5 | Nasi Goreng    | Makanan | 15000    │
//! └─────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kasir_core::{Product, ProductInput};

/// Columns selected for every `Product` read, joined with its category.
const PRODUCT_SELECT: &str = r#"
    SELECT
        p.id,
        p.category_id,
        c.name AS category_name,
        p.name,
        p.price,
        p.stock,
        p.created_at
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let drinks = repo.list(Some("teh")).await?;
/// let product = repo.get_by_id(5).await?;
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

    /// Lists products, optionally filtered by a name substring.
    ///
    /// An empty or whitespace-only filter is treated as no filter.
    pub async fn list(&self, name_filter: Option<&str>) -> DbResult<Vec<Product>> {
        let filter = name_filter.map(str::trim).filter(|s| !s.is_empty());

        debug!(filter = ?filter, "Listing products");

        let products = match filter {
            Some(name) => {
                let sql = format!("{PRODUCT_SELECT} WHERE p.name LIKE ?1 ESCAPE '\\' ORDER BY p.id");
                sqlx::query_as::<_, Product>(&sql)
                    .bind(like_pattern(name))
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("{PRODUCT_SELECT} ORDER BY p.id");
                sqlx::query_as::<_, Product>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let sql = format!("{PRODUCT_SELECT} WHERE p.id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with id and category name
    /// * `Err(DbError::ForeignKeyViolation)` - Category doesn't exist
    pub async fn insert(&self, input: &ProductInput) -> DbResult<Product> {
        debug!(name = %input.name, category_id = %input.category_id, "Inserting product");

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO products (category_id, name, price, stock, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id
            "#,
        )
        .bind(input.category_id)
        .bind(input.name.trim())
        .bind(input.price)
        .bind(input.stock)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Replaces every mutable field of a product, including stock.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    /// * `Err(DbError::ForeignKeyViolation)` - Category doesn't exist
    pub async fn update(&self, id: i64, input: &ProductInput) -> DbResult<Product> {
        debug!(id = %id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                category_id = ?2,
                name = ?3,
                price = ?4,
                stock = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(input.category_id)
        .bind(input.name.trim())
        .bind(input.price)
        .bind(input.stock)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a product.
    ///
    /// Products that appear in a recorded sale are kept: the ledger's
    /// foreign key refuses the delete.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    /// * `Err(DbError::ForeignKeyViolation)` - Referenced by a transaction detail
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Builds a `LIKE` pattern matching `needle` anywhere, with `%`, `_` and `\`
/// taken literally.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

// =============================================================================
// Unit Tests
// =============================================================================
