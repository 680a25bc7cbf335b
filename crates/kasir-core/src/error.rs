//! # Error Types
//!
//! Domain-specific error types for kasir-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kasir-core errors (this file)                                         │
//! │  ├── CoreError        - Domain failures (not found, out of stock)      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  kasir-db errors (separate crate)                                      │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── CheckoutError    - CoreError | DbError | TimedOut                 │
//! │                                                                         │
//! │  API errors (apps/api)                                                 │
//! │  └── ApiError         - What HTTP clients see (JSON)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Callers branch on the variant, never on the message text.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every variant aborts a checkout in full; none is partially recovered.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The referenced product does not exist.
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: i64 },

    /// Requested quantity exceeds the stock available at reservation time.
    ///
    /// ## User Workflow
    /// ```text
    /// Checkout line (product 7, qty: 5)
    ///      │
    ///      ▼
    /// Reserve: stock=1
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: 7, available: 1, requested: 5 }
    ///      │
    ///      ▼
    /// Whole checkout rolled back, client told "short by 4"
    /// ```
    #[error(
        "Insufficient stock for {product_name} (product {product_id}): available {available}, requested {requested}"
    )]
    InsufficientStock {
        product_id: i64,
        product_name: String,
        available: i64,
        requested: i64,
    },

    /// A subtotal or total does not fit in the money type.
    #[error("Amount overflow while pricing product {product_id}")]
    AmountOverflow { product_id: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns the product this error is about, when there is one.
    pub fn product_id(&self) -> Option<i64> {
        match self {
            CoreError::ProductNotFound { product_id }
            | CoreError::InsufficientStock { product_id, .. }
            | CoreError::AmountOverflow { product_id } => Some(*product_id),
            CoreError::Validation(_) => None,
        }
    }

    /// How many units are missing for an `InsufficientStock` error.
    pub fn shortfall(&self) -> Option<i64> {
        match self {
            CoreError::InsufficientStock {
                available,
                requested,
                ..
            } => Some(requested - available),
            _ => None,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are raised before any storage is touched.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A collection must contain at least one element.
    #[error("{field} must not be empty")]
    Empty { field: String },

    /// Range bounds are reversed.
    #[error("{start_field} must not be after {end_field}")]
    InvertedRange {
        start_field: String,
        end_field: String,
    },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    pub fn must_be_positive(field: impl Into<String>) -> Self {
        ValidationError::MustBePositive {
            field: field.into(),
        }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message_names_product() {
        let err = CoreError::InsufficientStock {
            product_id: 7,
            product_name: "Es Teh".to_string(),
            available: 1,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Es Teh (product 7): available 1, requested 5"
        );
        assert_eq!(err.product_id(), Some(7));
        assert_eq!(err.shortfall(), Some(4));
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::required("items[0].product_id").to_string(), "items[0].product_id is required");
        let err = ValidationError::Empty {
            field: "items".to_string(),
        };
        assert_eq!(err.to_string(), "items must not be empty");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::must_be_positive("quantity").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.product_id(), None);
        assert_eq!(core_err.shortfall(), None);
    }
}
