//! # Sale Recorder
//!
//! Writes one transaction header and its detail rows on the caller's
//! connection, inside the same unit of work as the reservations that priced
//! them.
//!
//! ```text
//! record(total, [d1, d2, ...])
//!      │
//!      ├── every subtotal == unit_price × quantity, total == Σ subtotals
//!      │
//!      ├── INSERT transactions (total_amount, idempotency_key, created_at)
//!      │        RETURNING id, total_amount, created_at
//!      │
//!      └── for each detail, in order:
//!             INSERT transaction_details (transaction_id, product_id,
//!                 product_name, quantity, subtotal) RETURNING *
//! ```

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{CheckoutError, DbError};
use kasir_core::{
    CoreError, Money, PendingDetail, Transaction, TransactionDetail, ValidationError,
};

/// Persists finalized sales.
#[derive(Debug, Clone, Copy, Default)]
pub struct SaleRecorder;

impl SaleRecorder {
    /// Records a sale and returns it with assigned ids and timestamp.
    ///
    /// ## Errors
    /// * `Validation(Empty)` - `details` is empty
    /// * `Storage(Internal)` - a subtotal is not `unit_price × quantity`, or
    ///   `total` is not the sum of the subtotals
    /// * `Storage(UniqueViolation)` - `idempotency_key` was already used
    pub async fn record(
        conn: &mut SqliteConnection,
        total: Money,
        details: &[PendingDetail],
        idempotency_key: Option<&str>,
    ) -> Result<Transaction, CheckoutError> {
        if details.is_empty() {
            return Err(CoreError::Validation(ValidationError::Empty {
                field: "details".to_string(),
            })
            .into());
        }

        if let Some(bad) = details
            .iter()
            .find(|d| d.unit_price.checked_times(d.quantity) != Some(d.subtotal))
        {
            return Err(DbError::Internal(format!(
                "subtotal {} of product {} is not {} × {}",
                bad.subtotal, bad.product_id, bad.unit_price, bad.quantity
            ))
            .into());
        }

        let sum = details
            .iter()
            .try_fold(Money::zero(), |acc, d| acc.checked_add(d.subtotal));
        if sum != Some(total) {
            return Err(DbError::Internal(format!(
                "sale total {total} does not match its details"
            ))
            .into());
        }

        let mut transaction = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (total_amount, idempotency_key, created_at)
            VALUES (?1, ?2, ?3)
            RETURNING id, total_amount, created_at
            "#,
        )
        .bind(total.cents())
        .bind(idempotency_key)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        let mut recorded = Vec::with_capacity(details.len());
        for detail in details {
            let row = sqlx::query_as::<_, TransactionDetail>(
                r#"
                INSERT INTO transaction_details
                    (transaction_id, product_id, product_name, quantity, subtotal)
                VALUES (?1, ?2, ?3, ?4, ?5)
                RETURNING id, transaction_id, product_id, product_name, quantity, subtotal
                "#,
            )
            .bind(transaction.id)
            .bind(detail.product_id)
            .bind(&detail.product_name)
            .bind(detail.quantity)
            .bind(detail.subtotal.cents())
            .fetch_one(&mut *conn)
            .await?;
            recorded.push(row);
        }
        transaction.details = recorded;

        debug!(
            transaction_id = transaction.id,
            total_amount = transaction.total_amount,
            details = transaction.details.len(),
            "Sale recorded"
        );

        Ok(transaction)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
