//! # Transaction Repository
//!
//! Read-back of the append-only sales ledger. Rows are written only by the
//! [`SaleRecorder`](crate::SaleRecorder) inside a checkout.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use kasir_core::{Transaction, TransactionDetail};

/// Repository for reading recorded sales.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Gets a transaction with its details (in recording order).
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Transaction>> {
        let header = sqlx::query_as::<_, Transaction>(
            "SELECT id, total_amount, created_at FROM transactions WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        self.with_details(header).await
    }

    /// Gets the transaction recorded under a client idempotency key.
    pub async fn get_by_idempotency_key(&self, key: &str) -> DbResult<Option<Transaction>> {
        debug!(idempotency_key = %key, "Looking up transaction by idempotency key");

        let header = sqlx::query_as::<_, Transaction>(
            "SELECT id, total_amount, created_at FROM transactions WHERE idempotency_key = ?1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        self.with_details(header).await
    }

    /// Counts every recorded transaction.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn with_details(&self, header: Option<Transaction>) -> DbResult<Option<Transaction>> {
        let Some(mut transaction) = header else {
            return Ok(None);
        };

        transaction.details = sqlx::query_as::<_, TransactionDetail>(
            r#"
            SELECT id, transaction_id, product_id, product_name, quantity, subtotal
            FROM transaction_details
            WHERE transaction_id = ?1
            ORDER BY id
            "#,
        )
        .bind(transaction.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(transaction))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::{Database, DbConfig, DbError};
    use kasir_core::{CategoryInput, CheckoutLine, ProductInput};

    #[tokio::test]
    async fn test_read_back_matches_checkout_result() {
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
                price: 15_000,
                stock: 10,
            })
            .await
            .unwrap();

        let key = "0b6f2c3e-8f1d-4c1a-9d55-6c7b8e2f0a11";
        let sale = db
            .checkout(Duration::from_secs(5))
            .run(&[CheckoutLine::new(product.id, 2)], Some(key))
            .await
            .unwrap();

        let by_id = db.transactions().get_by_id(sale.id).await.unwrap().unwrap();
        assert_eq!(by_id, sale);

        let by_key = db
            .transactions()
            .get_by_idempotency_key(key)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_key, sale);

        assert!(db.transactions().get_by_id(sale.id + 1).await.unwrap().is_none());
        assert_eq!(db.transactions().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_ledger_rows_are_immutable() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let category = db
            .categories()
            .insert(&CategoryInput {
                name: "Snack".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let product = db
            .products()
            .insert(&ProductInput {
                category_id: category.id,
                name: "Keripik".to_string(),
                price: 8_000,
                stock: 4,
            })
            .await
            .unwrap();
        let sale = db
            .checkout(Duration::from_secs(5))
            .run(&[CheckoutLine::new(product.id, 1)], None)
            .await
            .unwrap();

        let update: DbError = sqlx::query("UPDATE transactions SET total_amount = 0 WHERE id = ?1")
            .bind(sale.id)
            .execute(db.pool())
            .await
            .unwrap_err()
            .into();
        assert!(update.to_string().contains("append-only"));

        let delete: DbError = sqlx::query("DELETE FROM transaction_details WHERE transaction_id = ?1")
            .bind(sale.id)
            .execute(db.pool())
            .await
            .unwrap_err()
            .into();
        assert!(delete.to_string().contains("append-only"));

        // The product appears in a sale, so it stays.
        let err = db.products().delete(product.id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
