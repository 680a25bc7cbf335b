//! # Inventory Ledger
//!
//! Atomic check-and-decrement of product stock inside a checkout's unit of
//! work.
//!
//! ## Reservation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  reserve(product 5, qty 2)                                              │
//! │                                                                         │
//! │  UPDATE products SET stock = stock - 2                                  │
//! │  WHERE id = 5 AND stock >= 2                                            │
//! │  RETURNING name, price, stock                                           │
//! │       │                                                                 │
//! │       ├── 1 row  ──► PendingDetail { subtotal = price × 2 }             │
//! │       │                                                                 │
//! │       └── 0 rows ──► SELECT stock WHERE id = 5   (same transaction)     │
//! │                         ├── no row  ──► ProductNotFound                 │
//! │                         └── stock s ──► InsufficientStock { s, 2 }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The comparison and the write are one statement executed while the
//! connection holds SQLite's write lock, so a reservation never acts on a
//! stale stock value. The lock is held until the enclosing transaction
//! commits or rolls back, which makes concurrent checkouts serial.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::CheckoutError;
use kasir_core::{CheckoutLine, CoreError, Money, PendingDetail};

/// Row returned by a successful conditional decrement.
#[derive(Debug, sqlx::FromRow)]
struct Reserved {
    name: String,
    price: i64,
    stock: i64,
}

/// Row read back to classify a failed reservation.
#[derive(Debug, sqlx::FromRow)]
struct StockLevel {
    name: String,
    stock: i64,
}

/// Stock reservation operations.
///
/// Stateless: every call works on the connection of the caller's open
/// transaction, never on the pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryLedger;

impl InventoryLedger {
    /// Reserves `line.quantity` units of `line.product_id`.
    ///
    /// ## Returns
    /// * `Ok(PendingDetail)` - stock decremented, subtotal priced at this instant
    /// * `Err(CoreError::ProductNotFound)` - no such product
    /// * `Err(CoreError::InsufficientStock)` - fewer units on hand than requested
    /// * `Err(CoreError::AmountOverflow)` - `price × quantity` does not fit
    ///
    /// The decrement becomes visible to others only when the caller commits.
    pub async fn reserve(
        conn: &mut SqliteConnection,
        line: &CheckoutLine,
    ) -> Result<PendingDetail, CheckoutError> {
        let reserved = sqlx::query_as::<_, Reserved>(
            r#"
            UPDATE products SET stock = stock - ?2
            WHERE id = ?1 AND stock >= ?2
            RETURNING name, price, stock
            "#,
        )
        .bind(line.product_id)
        .bind(line.quantity)
        .fetch_optional(&mut *conn)
        .await?;

        let Some(reserved) = reserved else {
            return Err(Self::classify_shortfall(conn, line).await);
        };

        let unit_price = Money::from_cents(reserved.price);
        let subtotal = unit_price
            .checked_times(line.quantity)
            .ok_or(CoreError::AmountOverflow {
                product_id: line.product_id,
            })?;

        debug!(
            product_id = line.product_id,
            quantity = line.quantity,
            remaining = reserved.stock,
            subtotal = subtotal.cents(),
            "Stock reserved"
        );

        Ok(PendingDetail {
            product_id: line.product_id,
            product_name: reserved.name,
            quantity: line.quantity,
            unit_price,
            subtotal,
        })
    }

    /// Explains why a conditional decrement matched no row.
    async fn classify_shortfall(conn: &mut SqliteConnection, line: &CheckoutLine) -> CheckoutError {
        let level = sqlx::query_as::<_, StockLevel>("SELECT name, stock FROM products WHERE id = ?1")
            .bind(line.product_id)
            .fetch_optional(&mut *conn)
            .await;

        match level {
            Ok(None) => CoreError::ProductNotFound {
                product_id: line.product_id,
            }
            .into(),
            Ok(Some(level)) => CoreError::InsufficientStock {
                product_id: line.product_id,
                product_name: level.name,
                available: level.stock,
                requested: line.quantity,
            }
            .into(),
            Err(err) => err.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use kasir_core::{CategoryInput, ProductInput};

    async fn setup(price: i64, stock: i64) -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let category = db
            .categories()
            .insert(&CategoryInput {
                name: "Makanan".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let product = db
            .products()
            .insert(&ProductInput {
                category_id: category.id,
                name: "Nasi Goreng".to_string(),
                price,
                stock,
            })
            .await
            .unwrap();
        (db, product.id)
    }

    /// Stock as seen from inside the open transaction.
    async fn stock_in(conn: &mut SqliteConnection, product_id: i64) -> Option<i64> {
        sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
            .bind(product_id)
            .fetch_optional(conn)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_reserve_decrements_and_prices() {
        let (db, id) = setup(15_000, 10).await;
        let mut tx = db.pool().begin().await.unwrap();

        let detail = InventoryLedger::reserve(&mut tx, &CheckoutLine::new(id, 2))
            .await
            .unwrap();
        assert_eq!(detail.product_name, "Nasi Goreng");
        assert_eq!(detail.unit_price, Money::from_cents(15_000));
        assert_eq!(detail.subtotal, Money::from_cents(30_000));
        assert_eq!(stock_in(&mut tx, id).await, Some(8));

        tx.commit().await.unwrap();
        let product = db.products().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(product.stock, 8);
    }

    #[tokio::test]
    async fn test_reserve_exact_stock_reaches_zero() {
        let (db, id) = setup(1_000, 3).await;
        let mut tx = db.pool().begin().await.unwrap();

        InventoryLedger::reserve(&mut tx, &CheckoutLine::new(id, 3))
            .await
            .unwrap();
        assert_eq!(stock_in(&mut tx, id).await, Some(0));

        let err = InventoryLedger::reserve(&mut tx, &CheckoutLine::new(id, 1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Core(CoreError::InsufficientStock {
                available: 0,
                requested: 1,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_reserve_insufficient_leaves_stock() {
        let (db, id) = setup(5_000, 1).await;
        let mut tx = db.pool().begin().await.unwrap();

        let err = InventoryLedger::reserve(&mut tx, &CheckoutLine::new(id, 5))
            .await
            .unwrap_err();
        match err {
            CheckoutError::Core(core) => {
                assert_eq!(core.product_id(), Some(id));
                assert_eq!(core.shortfall(), Some(4));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(stock_in(&mut tx, id).await, Some(1));
    }

    #[tokio::test]
    async fn test_reserve_unknown_product() {
        let (db, _) = setup(5_000, 1).await;
        let mut tx = db.pool().begin().await.unwrap();

        let err = InventoryLedger::reserve(&mut tx, &CheckoutLine::new(999, 1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Core(CoreError::ProductNotFound { product_id: 999 })
        ));
        assert_eq!(stock_in(&mut tx, 999).await, None);
    }

    #[tokio::test]
    async fn test_reserve_overflow_is_domain_error() {
        let (db, id) = setup(i64::MAX / 2, 10).await;
        let mut tx = db.pool().begin().await.unwrap();

        let err = InventoryLedger::reserve(&mut tx, &CheckoutLine::new(id, 3))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Core(CoreError::AmountOverflow { .. })
        ));
    }
}
