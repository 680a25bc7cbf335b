//! # Validation Module
//!
//! Input validation utilities for Kasir.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (apps/api)                                      │
//! │  ├── JSON shape (deserialization)                                      │
//! │  └── Path / query parameter parsing                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE: business rule validation                        │
//! │  ├── checkout lines, product and category fields                       │
//! │  └── idempotency keys, date ranges                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (stock >= 0), CHECK (price > 0)                             │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kasir_core::validation::{validate_checkout_lines, CheckoutItemInput};
//!
//! let items = vec![CheckoutItemInput { product_id: Some(5), quantity: Some(2) }];
//! let lines = validate_checkout_lines(&items).unwrap();
//! assert_eq!(lines[0].quantity, 2);
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::{CategoryInput, CheckoutLine, ProductInput};
use crate::{MAX_CATEGORY_NAME_LEN, MAX_CHECKOUT_LINES, MAX_PRODUCT_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Checkout Validators
// =============================================================================

/// One raw checkout line as it arrives from a client.
///
/// Both fields are optional so that a missing field is reported as a
/// validation error naming the line, rather than a generic parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutItemInput {
    pub product_id: Option<i64>,
    pub quantity: Option<i64>,
}

/// Validates a checkout request and produces typed lines in request order.
///
/// ## Rules
/// - At least one line, at most `MAX_CHECKOUT_LINES`
/// - Every line names a product (`product_id > 0`)
/// - Every line has `quantity > 0`
///
/// Runs before any storage is touched.
pub fn validate_checkout_lines(items: &[CheckoutItemInput]) -> ValidationResult<Vec<CheckoutLine>> {
    if items.is_empty() {
        return Err(ValidationError::Empty {
            field: "items".to_string(),
        });
    }

    if items.len() > MAX_CHECKOUT_LINES {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_CHECKOUT_LINES as i64,
        });
    }

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let product_id = item
                .product_id
                .ok_or_else(|| ValidationError::required(format!("items[{idx}].product_id")))?;
            if product_id <= 0 {
                return Err(ValidationError::must_be_positive(format!(
                    "items[{idx}].product_id"
                )));
            }

            let quantity = item
                .quantity
                .ok_or_else(|| ValidationError::required(format!("items[{idx}].quantity")))?;
            validate_quantity(quantity)
                .map_err(|_| ValidationError::must_be_positive(format!("items[{idx}].quantity")))?;

            Ok(CheckoutLine::new(product_id, quantity))
        })
        .collect()
}

/// Validates lines that are already typed, with the same rules as
/// [`validate_checkout_lines`].
pub fn validate_lines(lines: &[CheckoutLine]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::Empty {
            field: "items".to_string(),
        });
    }

    if lines.len() > MAX_CHECKOUT_LINES {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_CHECKOUT_LINES as i64,
        });
    }

    for (idx, line) in lines.iter().enumerate() {
        if line.product_id <= 0 {
            return Err(ValidationError::must_be_positive(format!(
                "items[{idx}].product_id"
            )));
        }
        if line.quantity <= 0 {
            return Err(ValidationError::must_be_positive(format!(
                "items[{idx}].quantity"
            )));
        }
    }

    Ok(())
}

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::must_be_positive("quantity"));
    }
    Ok(())
}

/// Validates a client-supplied idempotency key.
///
/// ## Rules
/// - Must be a UUID (any version), hyphenated form
///
/// ## Returns
/// The key normalized to lowercase hyphenated form, so that
/// `"ABC..."` and `"abc..."` identify the same checkout.
pub fn validate_idempotency_key(key: &str) -> ValidationResult<String> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ValidationError::required("Idempotency-Key"));
    }

    let parsed = uuid::Uuid::try_parse(key)
        .map_err(|_| ValidationError::invalid_format("Idempotency-Key", "must be a valid UUID"))?;

    Ok(parsed.hyphenated().to_string())
}

// =============================================================================
// Product / Category Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most `MAX_PRODUCT_NAME_LEN` characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name, MAX_PRODUCT_NAME_LEN)
}

/// Validates a category name.
pub fn validate_category_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name, MAX_CATEGORY_NAME_LEN)
}

fn validate_name(field: &str, name: &str, max: usize) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required(field));
    }

    if name.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a product before insert or update.
///
/// ## Rules
/// - `category_id` present (> 0)
/// - name non-empty
/// - `price > 0`
/// - `stock > 0`
pub fn validate_product_input(input: &ProductInput) -> ValidationResult<()> {
    if input.category_id <= 0 {
        return Err(ValidationError::required("category_id"));
    }
    validate_product_name(&input.name)?;
    if input.price <= 0 {
        return Err(ValidationError::must_be_positive("price"));
    }
    if input.stock <= 0 {
        return Err(ValidationError::must_be_positive("stock"));
    }
    Ok(())
}

/// Validates a category before insert or update.
pub fn validate_category_input(input: &CategoryInput) -> ValidationResult<()> {
    validate_category_name(&input.name)
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses a `YYYY-MM-DD` report bound.
pub fn parse_report_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ValidationError::invalid_format(field, "expected YYYY-MM-DD"))
}

// =============================================================================
// Unit Tests
// =============================================================================
