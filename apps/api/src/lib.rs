//! # Kasir API
//!
//! HTTP surface of the Kasir point-of-sale backend.
//!
//! ## Endpoints
//! ```text
//! GET    /, /health                     liveness + database status
//! POST   /api/checkout                  reserve stock and record a sale
//! GET    /api/report/today              today's revenue, count, best seller
//! GET    /api/report?start_date&end_date  same, over an inclusive date range
//! GET    /api/transaction/{id}          a recorded sale with its details
//! GET    /api/category                  list / create categories
//! POST   /api/category
//! GET|PUT|DELETE /api/category/{id}
//! GET    /api/product?name=             list (filtered) / create products
//! POST   /api/product
//! GET|PUT|DELETE /api/product/{id}
//! ```
//!
//! Handlers are thin: they parse, call into `kasir-db`, and map errors
//! through [`ApiError`].

pub mod config;
pub mod error;
pub mod routes;

use std::time::Duration;

use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use kasir_db::Database;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult, ErrorCode};

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub checkout_timeout: Duration,
}

impl AppState {
    pub fn new(db: Database, checkout_timeout: Duration) -> Self {
        AppState {
            db,
            checkout_timeout,
        }
    }
}

/// Builds the application router with tracing and CORS layers.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Result<Router, ConfigError> {
    let cors = cors_layer(cors_origins)?;

    let app = routes::create_router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer, ConfigError> {
    let allow_origin = if origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        let origins = origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .map_err(|_| ConfigError::InvalidValue("KASIR_CORS_ORIGINS".to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(routes::checkout::IDEMPOTENCY_KEY_HEADER),
        ])
        .allow_origin(allow_origin))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use kasir_core::{CategoryInput, ProductInput};
    use kasir_db::DbConfig;
    use serde_json::Value;
    use tower::ServiceExt;

    pub async fn app() -> (Router, Database) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let state = AppState::new(db.clone(), Duration::from_secs(5));
        let router = build_router(state, &["*".to_string()]).unwrap();
        (router, db)
    }

    /// Inserts a category and a product, returning the product id.
    pub async fn seed_product(db: &Database, name: &str, price: i64, stock: i64) -> i64 {
        let category = match db.categories().list().await.unwrap().into_iter().next() {
            Some(category) => category,
            None => db
                .categories()
                .insert(&CategoryInput {
                    name: "Minuman".to_string(),
                    description: None,
                })
                .await
                .unwrap(),
        };
        db.products()
            .insert(&ProductInput {
                category_id: category.id,
                name: name.to_string(),
                price,
                stock,
            })
            .await
            .unwrap()
            .id
    }

    pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    pub fn delete(uri: &str) -> Request<Body> {
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    pub fn json(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_origins() {
        assert!(cors_layer(&["*".to_string()]).is_ok());
        assert!(cors_layer(&["http://localhost:5173".to_string()]).is_ok());
        assert!(cors_layer(&["bad\norigin".to_string()]).is_err());
    }
}
