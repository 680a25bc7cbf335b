//! Pool-backed repositories, one per table family.
//!
//! - [`category::CategoryRepository`]: category CRUD
//! - [`product::ProductRepository`]: product CRUD and the name filter
//! - [`transaction::TransactionRepository`]: read-back of recorded sales
//! - [`report::ReportRepository`]: revenue, count and best seller per window
//!
//! Sales are written only by the checkout orchestrator. Nothing here inserts,
//! updates or deletes a transaction.

pub mod category;
pub mod product;
pub mod report;
pub mod transaction;
