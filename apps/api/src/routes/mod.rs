//! Route table.

pub mod category;
pub mod checkout;
pub mod health;
pub mod product;
pub mod report;
pub mod transaction;

use axum::routing::{get, post};
use axum::Router;

use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/api/checkout", post(checkout::checkout))
        .route("/api/report/today", get(report::today))
        .route("/api/report", get(report::range))
        .route("/api/transaction/{id}", get(transaction::get_transaction))
        .route(
            "/api/category",
            get(category::list_categories).post(category::create_category),
        )
        .route(
            "/api/category/{id}",
            get(category::get_category)
                .put(category::update_category)
                .delete(category::delete_category),
        )
        .route(
            "/api/product",
            get(product::list_products).post(product::create_product),
        )
        .route(
            "/api/product/{id}",
            get(product::get_product)
                .put(product::update_product)
                .delete(product::delete_product),
        )
}
