//! # Database Handle
//!
//! Opens the SQLite file, applies the schema and hands out repositories and
//! checkout orchestrators that share one pool.
//!
//! ## Readers and the Writer
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SqlitePool (max_connections)                                           │
//! │                                                                         │
//! │   report / CRUD read ──► any connection, WAL snapshot, never waits      │
//! │                                                                         │
//! │   checkout A ──► BEGIN, UPDATE products ... ──► holds write lock        │
//! │   checkout B ──► BEGIN, UPDATE products ... ──► sleeps on busy_timeout  │
//! │                                      │                                  │
//! │                       A commits ─────┘──► B proceeds on fresh stock     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::checkout::CheckoutService;
use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::category::CategoryRepository;
use crate::repository::product::ProductRepository;
use crate::repository::report::ReportRepository;
use crate::repository::transaction::TransactionRepository;

/// How to open the store.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
    pub max_connections: u32,
    /// Wait for a free pooled connection.
    pub acquire_timeout: Duration,
    /// Wait for SQLite's write lock before a statement fails with `SQLITE_BUSY`.
    pub busy_timeout: Duration,
    pub migrate: bool,
}

impl DbConfig {
    /// A file-backed store at `path`, created on first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            path: path.into(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_secs(5),
            migrate: true,
        }
    }

    /// A private in-memory store. Every connection to `:memory:` is a
    /// separate database, so the pool is pinned to one connection.
    pub fn in_memory() -> Self {
        DbConfig {
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            ..DbConfig::new(":memory:")
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max.max(1);
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Open without touching the schema.
    pub fn skip_migrations(mut self) -> Self {
        self.migrate = false;
        self
    }
}

/// Shared handle to the store.
///
/// Cloning is cheap and every clone uses the same pool, so the handle is
/// passed around as application state directly.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool with WAL journaling, foreign keys and a busy timeout,
    /// then applies pending migrations unless told not to.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.path.display(), "Opening database");

        let url = format!("sqlite://{}?mode=rwc", config.path.display());
        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(
            max_connections = config.max_connections,
            busy_timeout_ms = config.busy_timeout.as_millis() as u64,
            "Database pool ready"
        );

        let db = Database { pool };
        if config.migrate {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    /// Applies embedded migrations that have not run yet.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone())
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    /// Read-back of recorded sales.
    pub fn transactions(&self) -> TransactionRepository {
        TransactionRepository::new(self.pool.clone())
    }

    pub fn reports(&self) -> ReportRepository {
        ReportRepository::new(self.pool.clone())
    }

    /// A checkout orchestrator whose unit of work is bounded by `timeout`.
    ///
    /// ```rust,ignore
    /// let sale = db.checkout(Duration::from_secs(10)).run(&lines, None).await?;
    /// ```
    pub fn checkout(&self, timeout: Duration) -> CheckoutService {
        CheckoutService::new(self.pool.clone(), timeout)
    }

    /// Closes every pooled connection; later calls fail.
    pub async fn close(&self) {
        info!("Closing database");
        self.pool.close().await;
    }

    /// `true` when a trivial query succeeds.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
