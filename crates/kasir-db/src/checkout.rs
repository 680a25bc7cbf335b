//! # Checkout Orchestrator
//!
//! Turns a list of checkout lines into one committed sale, or into nothing.
//!
//! ## Stages
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Validating ──► Reserving ──► Recording ──► Committed                   │
//! │      │              │             │             ▲                       │
//! │      │              │             │             │ commit ok             │
//! │      ▼              ▼             ▼             │                       │
//! │  ┌──────────────────────────────────────────────┴───┐                   │
//! │  │                    Aborted                       │                   │
//! │  │  rollback: no stock changed, no transaction row  │                   │
//! │  └──────────────────────────────────────────────────┘                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **Validating** happens before any connection is taken from the pool.
//! - **Reserving** opens the database transaction; each line, in request
//!   order, goes through [`InventoryLedger::reserve`]. The first failure
//!   aborts the whole unit.
//! - **Recording** hands the accumulated total and details to
//!   [`SaleRecorder::record`].
//! - **Committed** is reached only after `COMMIT` succeeds.
//!
//! The whole unit runs under a deadline. When it fires, the in-flight future
//! is dropped, and dropping an uncommitted `sqlx::Transaction` rolls it back.
//! A dropped HTTP request has the same effect.
//!
//! ## Idempotency
//! ```text
//! key K supplied?
//!   ├── transaction with K exists ──► return it (stock untouched)
//!   └── run unit of work, header stored with K (UNIQUE)
//!          └── failed while K was committed elsewhere ──► return that sale
//! ```

use std::fmt;
use std::time::Duration;

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{CheckoutError, DbError};
use crate::inventory::InventoryLedger;
use crate::recorder::SaleRecorder;
use crate::repository::transaction::TransactionRepository;
use kasir_core::validation::{validate_idempotency_key, validate_lines};
use kasir_core::{CheckoutLine, CoreError, Money, Transaction};

// =============================================================================
// Stage
// =============================================================================

/// Where a checkout is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStage {
    Validating,
    Reserving,
    Recording,
    Committed,
    Aborted,
}

impl fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckoutStage::Validating => "validating",
            CheckoutStage::Reserving => "reserving",
            CheckoutStage::Recording => "recording",
            CheckoutStage::Committed => "committed",
            CheckoutStage::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Service
// =============================================================================

/// Runs checkouts against the store.
///
/// One value can serve any number of concurrent checkouts; each call to
/// [`run`](Self::run) is its own state machine.
#[derive(Debug, Clone)]
pub struct CheckoutService {
    pool: SqlitePool,
    timeout: Duration,
}

impl CheckoutService {
    pub fn new(pool: SqlitePool, timeout: Duration) -> Self {
        CheckoutService { pool, timeout }
    }

    /// Validates, reserves, records and commits one checkout.
    ///
    /// ## Returns
    /// * `Ok(Transaction)` - the committed sale with ids and details
    /// * `Err(CheckoutError::Core(..))` - validation, unknown product, not enough stock
    /// * `Err(CheckoutError::Storage(..))` - the store failed
    /// * `Err(CheckoutError::TimedOut(..))` - the deadline passed
    ///
    /// On any error nothing is committed.
    pub async fn run(
        &self,
        lines: &[CheckoutLine],
        idempotency_key: Option<&str>,
    ) -> Result<Transaction, CheckoutError> {
        debug!(stage = %CheckoutStage::Validating, lines = lines.len(), "Checkout started");

        validate_lines(lines)?;
        let key = idempotency_key.map(validate_idempotency_key).transpose()?;

        match tokio::time::timeout(self.timeout, self.run_keyed(lines, key.as_deref())).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(
                    stage = %CheckoutStage::Aborted,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Checkout timed out, unit of work rolled back"
                );
                Err(CheckoutError::TimedOut(self.timeout))
            }
        }
    }

    /// Everything bounded by the deadline: replay lookup, unit of work and
    /// the lookup after a failed attempt.
    ///
    /// A caller that shares its key with a concurrent checkout can fail for
    /// any reason the winner caused (stock already gone, UNIQUE on the key).
    /// Once the winner has committed, its sale is the answer for every caller.
    async fn run_keyed(
        &self,
        lines: &[CheckoutLine],
        key: Option<&str>,
    ) -> Result<Transaction, CheckoutError> {
        let Some(key) = key else {
            return self.execute(lines, None).await;
        };

        if let Some(existing) = self.transactions().get_by_idempotency_key(key).await? {
            info!(
                transaction_id = existing.id,
                idempotency_key = %key,
                "Checkout replayed from idempotency key"
            );
            return Ok(existing);
        }

        match self.execute(lines, Some(key)).await {
            Ok(sale) => Ok(sale),
            Err(err) => match self.transactions().get_by_idempotency_key(key).await {
                Ok(Some(winner)) => {
                    info!(
                        transaction_id = winner.id,
                        idempotency_key = %key,
                        error = %err,
                        "Concurrent checkout with the same key committed first"
                    );
                    Ok(winner)
                }
                _ => Err(err),
            },
        }
    }

    /// The unit of work: begin, reserve every line, record, commit.
    async fn execute(
        &self,
        lines: &[CheckoutLine],
        idempotency_key: Option<&str>,
    ) -> Result<Transaction, CheckoutError> {
        let mut tx = self.pool.begin().await?;
        let mut stage = CheckoutStage::Reserving;

        match Self::reserve_and_record(&mut tx, lines, idempotency_key, &mut stage).await {
            Ok(sale) => {
                if let Err(err) = tx.commit().await {
                    warn!(stage = %stage, error = %err, "Checkout commit failed");
                    return Err(DbError::TransactionFailed(err.to_string()).into());
                }

                info!(
                    stage = %CheckoutStage::Committed,
                    transaction_id = sale.id,
                    total_amount = sale.total_amount,
                    lines = sale.details.len(),
                    "Checkout committed"
                );
                Ok(sale)
            }
            Err(err) => {
                warn!(
                    stage = %CheckoutStage::Aborted,
                    failed_at = %stage,
                    product_id = ?core_product(&err),
                    error = %err,
                    "Checkout aborted"
                );
                if let Err(rollback_err) = tx.rollback().await {
                    // Dropping the connection still discards the work.
                    warn!(error = %rollback_err, "Checkout rollback failed");
                }
                Err(err)
            }
        }
    }

    async fn reserve_and_record(
        conn: &mut SqliteConnection,
        lines: &[CheckoutLine],
        idempotency_key: Option<&str>,
        stage: &mut CheckoutStage,
    ) -> Result<Transaction, CheckoutError> {
        let mut total = Money::zero();
        let mut details = Vec::with_capacity(lines.len());

        for line in lines {
            let detail = InventoryLedger::reserve(&mut *conn, line).await?;
            total = total
                .checked_add(detail.subtotal)
                .ok_or(CoreError::AmountOverflow {
                    product_id: line.product_id,
                })?;
            details.push(detail);
        }

        *stage = CheckoutStage::Recording;
        debug!(stage = %stage, total_amount = total.cents(), "All lines reserved");

        SaleRecorder::record(conn, total, &details, idempotency_key).await
    }

    fn transactions(&self) -> TransactionRepository {
        TransactionRepository::new(self.pool.clone())
    }
}

fn core_product(err: &CheckoutError) -> Option<i64> {
    match err {
        CheckoutError::Core(core) => core.product_id(),
        _ => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
