//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Handler ── Result<T, ApiError>                                         │
//! │     │                                                                   │
//! │     ├── ValidationError / rejection ──► VALIDATION_ERROR    400         │
//! │     ├── CoreError::ProductNotFound  ──► NOT_FOUND           404         │
//! │     ├── CoreError::InsufficientStock ─► INSUFFICIENT_STOCK  409         │
//! │     ├── DbError::UniqueViolation / FK ► CONFLICT            409         │
//! │     ├── CheckoutError::TimedOut     ──► TIMEOUT             504         │
//! │     └── anything the store threw    ──► DATABASE_ERROR      500         │
//! │                                         (logged, message is generic)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Response Body
//! ```json
//! {
//!   "code": "INSUFFICIENT_STOCK",
//!   "message": "Insufficient stock for Es Teh (product 7): available 1, requested 5",
//!   "product_id": 7,
//!   "shortfall": 4
//! }
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use kasir_core::{CoreError, ValidationError};
use kasir_db::{CheckoutError, DbError};

/// Error returned by every handler.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// The product a checkout failed on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i64>,

    /// Units missing for an insufficient-stock failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortfall: Option<i64>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Resource not found (404)
    NotFound,

    /// Not enough stock for a checkout line (409)
    InsufficientStock,

    /// Duplicate or still-referenced resource (409)
    Conflict,

    /// Checkout deadline passed (504)
    Timeout,

    /// Database operation failed (500)
    DatabaseError,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InsufficientStock | ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            product_id: None,
            shortfall: None,
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Conflict, message)
    }

    fn for_product(mut self, product_id: Option<i64>) -> Self {
        self.product_id = product_id;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            DbError::UniqueViolation { field, value } => {
                ApiError::conflict(format!("{} '{}' already exists", field, value))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!("Foreign key violation: {}", message);
                ApiError::conflict("Resource is referenced by other records")
            }
            DbError::CheckViolation { message } => {
                tracing::warn!("Check constraint violation: {}", message);
                ApiError::validation("Value violates a data constraint")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                tracing::error!("Database pool exhausted");
                ApiError::new(ErrorCode::DatabaseError, "Database is busy")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let product_id = err.product_id();
        match &err {
            CoreError::ProductNotFound { product_id } => {
                ApiError::not_found("Product", product_id).for_product(Some(*product_id))
            }
            CoreError::InsufficientStock { .. } => {
                let mut api = ApiError::new(ErrorCode::InsufficientStock, err.to_string())
                    .for_product(product_id);
                api.shortfall = err.shortfall();
                api
            }
            CoreError::AmountOverflow { .. } => {
                ApiError::validation(err.to_string()).for_product(product_id)
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Core(e) => e.into(),
            CheckoutError::Storage(e) => e.into(),
            CheckoutError::TimedOut(after) => {
                tracing::warn!(timeout_ms = after.as_millis() as u64, "Checkout timed out");
                ApiError::new(
                    ErrorCode::Timeout,
                    "Checkout timed out, no changes were applied",
                )
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_insufficient_stock_names_product_and_shortfall() {
        let err: ApiError = CheckoutError::Core(CoreError::InsufficientStock {
            product_id: 7,
            product_name: "Es Teh".to_string(),
            available: 1,
            requested: 5,
        })
        .into();

        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.product_id, Some(7));
        assert_eq!(err.shortfall, Some(4));

        let body = serde_json::to_value(&err).unwrap();
        assert_eq!(body["code"], "INSUFFICIENT_STOCK");
        assert_eq!(body["product_id"], 7);
    }

    #[test]
    fn test_status_mapping() {
        let not_found: ApiError = CoreError::ProductNotFound { product_id: 3 }.into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.product_id, Some(3));

        let timeout: ApiError = CheckoutError::TimedOut(Duration::from_secs(10)).into();
        assert_eq!(timeout.status(), StatusCode::GATEWAY_TIMEOUT);

        let invalid: ApiError = ValidationError::required("items[0].quantity").into();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.message, "items[0].quantity is required");

        let dup: ApiError = DbError::duplicate("idempotency_key", "k").into();
        assert_eq!(dup.code, ErrorCode::Conflict);
    }

    #[test]
    fn test_storage_details_are_not_leaked() {
        let err: ApiError = DbError::QueryFailed("no such table: products".to_string()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("products"));

        let body = serde_json::to_value(&err).unwrap();
        assert_eq!(body["code"], "DATABASE_ERROR");
        assert!(body.get("product_id").is_none());
    }
}
