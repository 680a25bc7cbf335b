//! # Report Aggregator
//!
//! Read-only aggregates over the sales ledger for a [`ReportWindow`].
//!
//! ## Query Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN (read)                                                           │
//! │    1. SUM(total_amount), COUNT(*)  FROM transactions  IN [start, end)   │
//! │    2. SUM(quantity) per product_id FROM details ⋈ transactions          │
//! │       ORDER BY qty DESC, product_id ASC  LIMIT 1                        │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Both statements read one snapshot, so the best seller always belongs to
//! the same set of transactions that produced the revenue figure. Ties on
//! quantity go to the lowest product id.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kasir_core::{BestSeller, ReportWindow, TransactionReport};

/// Repository computing sales reports.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Report for the current UTC day.
    pub async fn today(&self) -> DbResult<TransactionReport> {
        let window =
            ReportWindow::today(Utc::now()).map_err(|e| DbError::Internal(e.to_string()))?;
        self.summarize(window).await
    }

    /// Report for an explicit window, e.g. from [`ReportWindow::for_dates`].
    pub async fn for_window(&self, window: ReportWindow) -> DbResult<TransactionReport> {
        self.summarize(window).await
    }

    async fn summarize(&self, window: ReportWindow) -> DbResult<TransactionReport> {
        debug!(start = %window.start, end = %window.end, "Aggregating sales report");

        let mut tx = self.pool.begin().await?;

        let (total_revenue, total_transactions): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(total_amount), 0), COUNT(*)
            FROM transactions
            WHERE created_at >= ?1 AND created_at < ?2
            "#,
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_one(&mut *tx)
        .await?;

        let best_seller = sqlx::query_as::<_, BestSeller>(
            r#"
            SELECT
                td.product_id AS product_id,
                p.name AS name,
                SUM(td.quantity) AS quantity_sold
            FROM transaction_details td
            JOIN transactions t ON t.id = td.transaction_id
            JOIN products p ON p.id = td.product_id
            WHERE t.created_at >= ?1 AND t.created_at < ?2
            GROUP BY td.product_id, p.name
            ORDER BY quantity_sold DESC, td.product_id ASC
            LIMIT 1
            "#,
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(
            total_revenue,
            total_transactions,
            best_seller = ?best_seller.as_ref().map(|b| b.product_id),
            "Sales report computed"
        );

        Ok(TransactionReport {
            total_revenue,
            total_transactions,
            best_seller,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
