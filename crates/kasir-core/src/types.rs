//! # Domain Types
//!
//! Core domain types used throughout Kasir.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │    Category     │◄──│    Product      │◄──│ TransactionDetail   │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  id             │   │  id             │   │  transaction_id     │   │
//! │  │  name           │   │  category_id    │   │  product_id         │   │
//! │  │  description    │   │  name, price    │   │  product_name (snap)│   │
//! │  └─────────────────┘   │  stock ≥ 0      │   │  quantity, subtotal │   │
//! │                        └─────────────────┘   └─────────┬───────────┘   │
//! │                                                        │ 1..n          │
//! │  ┌─────────────────┐                       ┌───────────▼───────────┐   │
//! │  │  CheckoutLine   │  input only,          │     Transaction       │   │
//! │  │  product_id     │  never persisted      │  total_amount         │   │
//! │  │  quantity > 0   │                       │  created_at, details  │   │
//! │  └─────────────────┘                       └───────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A detail freezes the product name and the computed subtotal at the time of
//! sale. Later price or name edits never change recorded sales.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating or replacing a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,

    pub category_id: i64,

    /// Name of the category, filled by joined reads.
    pub category_name: Option<String>,

    /// Display name shown to cashier and on receipts.
    pub name: String,

    /// Unit price in the smallest currency unit.
    pub price: i64,

    /// Units on hand. Never negative in any committed state.
    pub stock: i64,

    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating or replacing a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInput {
    pub category_id: i64,
    pub name: String,
    pub price: i64,
    pub stock: i64,
}

// =============================================================================
// Checkout Line
// =============================================================================

/// One validated line of a checkout request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLine {
    pub product_id: i64,
    pub quantity: i64,
}

impl CheckoutLine {
    pub fn new(product_id: i64, quantity: i64) -> Self {
        CheckoutLine {
            product_id,
            quantity,
        }
    }
}

// =============================================================================
// Transaction Detail
// =============================================================================

/// A line of a recorded sale. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TransactionDetail {
    pub id: i64,
    pub transaction_id: i64,
    pub product_id: i64,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    pub quantity: i64,
    /// Unit price at time of sale × quantity.
    pub subtotal: i64,
}

impl TransactionDetail {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal)
    }
}

/// A detail computed during reservation, before it has identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDetail {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
}

// =============================================================================
// Transaction
// =============================================================================

/// A finalized sale: the append-only ledger entry written once per
/// successful checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Transaction {
    pub id: i64,
    pub total_amount: i64,
    pub created_at: DateTime<Utc>,
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub details: Vec<TransactionDetail>,
}

impl Transaction {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_amount)
    }

    /// Checks that the header total equals the sum of detail subtotals.
    pub fn is_balanced(&self) -> bool {
        let sum: Money = self.details.iter().map(TransactionDetail::subtotal).sum();
        sum == self.total()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(id: i64, subtotal: i64) -> TransactionDetail {
        TransactionDetail {
            id,
            transaction_id: 1,
            product_id: id,
            product_name: format!("product-{id}"),
            quantity: 1,
            subtotal,
        }
    }

    #[test]
    fn test_transaction_balance() {
        let mut tx = Transaction {
            id: 1,
            total_amount: 45_000,
            created_at: Utc::now(),
            details: vec![detail(1, 30_000), detail(2, 15_000)],
        };
        assert!(tx.is_balanced());

        tx.total_amount = 40_000;
        assert!(!tx.is_balanced());
    }

    #[test]
    fn test_transaction_json_shape() {
        let tx = Transaction {
            id: 9,
            total_amount: 30_000,
            created_at: Utc::now(),
            details: vec![detail(1, 30_000)],
        };
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["id"], 9);
        assert_eq!(value["total_amount"], 30_000);
        assert_eq!(value["details"][0]["subtotal"], 30_000);
        assert!(value["created_at"].is_string());
    }
}
