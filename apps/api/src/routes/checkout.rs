//! `POST /api/checkout`
//!
//! ```text
//! POST /api/checkout
//! Idempotency-Key: 6a1f7b6e-4a55-4b8e-9b7c-2d9e5f3c1a00   (optional)
//!
//! { "items": [ { "product_id": 5, "quantity": 2 } ] }
//!
//! 201 Created
//! { "id": 1, "total_amount": 30000, "created_at": "...",
//!   "details": [ { "product_id": 5, "quantity": 2, "subtotal": 30000, ... } ] }
//! ```

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use kasir_core::validation::{validate_checkout_lines, CheckoutItemInput};
use kasir_core::Transaction;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub items: Vec<CheckoutItemInput>,
}

pub async fn checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let Json(request) = payload?;
    let lines = validate_checkout_lines(&request.items)?;

    let key = headers
        .get(IDEMPOTENCY_KEY_HEADER)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| ApiError::validation("Idempotency-Key must be a valid UUID"))
        })
        .transpose()?;

    let sale = state
        .db
        .checkout(state.checkout_timeout)
        .run(&lines, key)
        .await?;

    Ok((StatusCode::CREATED, Json(sale)))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{app, json, seed_product, send};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_checkout_records_sale() {
        let (router, db) = app().await;
        let id = seed_product(&db, "Nasi Goreng", 15_000, 10).await;

        let (status, body) = send(
            &router,
            json("POST", "/api/checkout", json!({ "items": [{ "product_id": id, "quantity": 2 }] })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["total_amount"], 30_000);
        assert_eq!(body["details"].as_array().unwrap().len(), 1);
        assert_eq!(body["details"][0]["subtotal"], 30_000);
        assert_eq!(body["details"][0]["product_id"], id);

        let product = db.products().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(product.stock, 8);
    }

    #[tokio::test]
    async fn test_checkout_insufficient_stock_names_product() {
        let (router, db) = app().await;
        let id = seed_product(&db, "Es Teh", 5_000, 1).await;

        let (status, body) = send(
            &router,
            json("POST", "/api/checkout", json!({ "items": [{ "product_id": id, "quantity": 5 }] })),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "INSUFFICIENT_STOCK");
        assert_eq!(body["product_id"], id);
        assert_eq!(body["shortfall"], 4);
        assert_eq!(db.products().get_by_id(id).await.unwrap().unwrap().stock, 1);
        assert_eq!(db.transactions().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_checkout_unknown_product_is_not_found() {
        let (router, db) = app().await;
        let id = seed_product(&db, "Kopi Susu", 12_000, 5).await;

        let (status, body) = send(
            &router,
            json(
                "POST",
                "/api/checkout",
                json!({ "items": [
                    { "product_id": id, "quantity": 1 },
                    { "product_id": 9_999, "quantity": 1 }
                ] }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["product_id"], 9_999);
        assert_eq!(db.products().get_by_id(id).await.unwrap().unwrap().stock, 5);
    }

    #[tokio::test]
    async fn test_checkout_rejects_malformed_input() {
        let (router, _db) = app().await;

        let (status, body) = send(&router, json("POST", "/api/checkout", json!({ "items": [] }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, _) = send(&router, json("POST", "/api/checkout", json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &router,
            json("POST", "/api/checkout", json!({ "items": [{ "product_id": 1, "quantity": 0 }] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "items[0].quantity must be positive");

        let (status, body) = send(
            &router,
            json("POST", "/api/checkout", json!({ "items": [{ "product_id": "five", "quantity": 1 }] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_checkout_idempotency_key_replays() {
        let (router, db) = app().await;
        let id = seed_product(&db, "Bakso", 12_000, 10).await;
        let key = "6a1f7b6e-4a55-4b8e-9b7c-2d9e5f3c1a00";

        let request = || {
            let mut req = json(
                "POST",
                "/api/checkout",
                json!({ "items": [{ "product_id": id, "quantity": 3 }] }),
            );
            req.headers_mut()
                .insert("Idempotency-Key", key.parse().unwrap());
            req
        };

        let (first_status, first) = send(&router, request()).await;
        let (second_status, second) = send(&router, request()).await;

        assert_eq!(first_status, StatusCode::CREATED);
        assert_eq!(second_status, StatusCode::CREATED);
        assert_eq!(first["id"], second["id"]);
        assert_eq!(db.products().get_by_id(id).await.unwrap().unwrap().stock, 7);
        assert_eq!(db.transactions().count().await.unwrap(), 1);

        let mut bad = request();
        bad.headers_mut()
            .insert("Idempotency-Key", "not-a-uuid".parse().unwrap());
        let (status, _) = send(&router, bad).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
