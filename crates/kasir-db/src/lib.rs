//! # kasir-db: Database Layer for Kasir
//!
//! This crate provides database access for the Kasir point-of-sale backend.
//! It uses SQLite with sqlx for async operations, and owns the checkout unit
//! of work end to end.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Kasir Data Flow                                │
//! │                                                                         │
//! │  HTTP handler (POST /api/checkout)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     kasir-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌────────────────┐   ┌────────────────┐  │   │
//! │  │   │  checkout.rs  │──►│  inventory.rs  │   │  recorder.rs   │  │   │
//! │  │   │ Orchestrator  │   │ InventoryLedger│   │  SaleRecorder  │  │   │
//! │  │   │ (state machine│──────────────────────►│  (append-only) │  │   │
//! │  │   └───────────────┘   └────────────────┘   └────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌────────────────┐   ┌────────────────┐  │   │
//! │  │   │   Database    │   │  Repositories  │   │   Migrations   │  │   │
//! │  │   │   (pool.rs)   │   │ category/product│  │   (embedded)   │  │   │
//! │  │   │  SqlitePool   │   │ transaction/   │   │ 001_initial    │  │   │
//! │  │   │               │   │ report         │   │                │  │   │
//! │  │   └───────────────┘   └────────────────┘   └────────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (kasir.db)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and checkout error types
//! - [`repository`] - CRUD repositories and the report aggregator
//! - [`inventory`] - Stock reservation inside a checkout
//! - [`recorder`] - Writes the sale header and details
//! - [`checkout`] - The checkout orchestrator
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use kasir_core::CheckoutLine;
//! use kasir_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./kasir.db")).await?;
//!
//! let sale = db
//!     .checkout(Duration::from_secs(10))
//!     .run(&[CheckoutLine::new(5, 2)], None)
//!     .await?;
//! println!("recorded transaction {} total {}", sale.id, sale.total());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod inventory;
pub mod migrations;
pub mod pool;
pub mod recorder;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::{CheckoutService, CheckoutStage};
pub use error::{CheckoutError, DbError, DbResult};
pub use inventory::InventoryLedger;
pub use pool::{Database, DbConfig};
pub use recorder::SaleRecorder;

// Repository re-exports for convenience
pub use repository::category::CategoryRepository;
pub use repository::product::ProductRepository;
pub use repository::report::ReportRepository;
pub use repository::transaction::TransactionRepository;
