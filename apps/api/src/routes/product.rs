//! Product CRUD.
//!
//! A product that points at a missing category is the client's mistake
//! (400); a product that already appears in a sale cannot be deleted (409).

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use kasir_core::validation::validate_product_input;
use kasir_core::{Product, ProductInput};
use kasir_db::DbError;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    /// Case-insensitive substring of the product name
    pub name: Option<String>,
}

pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Product>>> {
    let Query(query) = query?;
    let filter = query
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());

    Ok(Json(state.db.products().list(filter).await?))
}

pub async fn get_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Product>> {
    let Path(id) = id?;
    state
        .db
        .products()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product", id))
}

pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let Json(input) = payload?;
    validate_product_input(&input)?;

    let product = state
        .db
        .products()
        .insert(&input)
        .await
        .map_err(|err| unknown_category(err, input.category_id))?;

    tracing::info!(product_id = product.id, stock = product.stock, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let Path(id) = id?;
    let Json(input) = payload?;
    validate_product_input(&input)?;

    let product = state
        .db
        .products()
        .update(id, &input)
        .await
        .map_err(|err| unknown_category(err, input.category_id))?;

    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;

    match state.db.products().delete(id).await {
        Ok(()) => {
            tracing::info!(product_id = id, "Product deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(DbError::ForeignKeyViolation { .. }) => Err(ApiError::conflict(format!(
            "Product {id} appears in recorded sales"
        ))),
        Err(err) => Err(err.into()),
    }
}

fn unknown_category(err: DbError, category_id: i64) -> ApiError {
    match err {
        DbError::ForeignKeyViolation { .. } => ApiError::validation(format!(
            "category_id {category_id} does not reference an existing category"
        )),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{app, delete, get, json, seed_product, send};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_product_crud() {
        let (router, db) = app().await;
        seed_product(&db, "Es Jeruk", 6_000, 10).await;
        let category_id = db.categories().list().await.unwrap()[0].id;

        let (status, created) = send(
            &router,
            json(
                "POST",
                "/api/product",
                json!({ "category_id": category_id, "name": "Teh Tarik", "price": 8_000, "stock": 20 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["category_name"], "Minuman");
        let id = created["id"].as_i64().unwrap();

        let (status, updated) = send(
            &router,
            json(
                "PUT",
                &format!("/api/product/{id}"),
                json!({ "category_id": category_id, "name": "Teh Tarik", "price": 9_000, "stock": 15 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["price"], 9_000);
        assert_eq!(updated["stock"], 15);

        let (status, list) = send(&router, get("/api/product?name=TEH")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (_, all) = send(&router, get("/api/product?name=")).await;
        assert_eq!(all.as_array().unwrap().len(), 2);

        let (status, _) = send(&router, delete(&format!("/api/product/{id}"))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&router, get(&format!("/api/product/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_product_validation() {
        let (router, _db) = app().await;

        for (body, message) in [
            (json!({ "category_id": 1, "name": "Klepon", "price": 0, "stock": 5 }), "price must be positive"),
            (json!({ "category_id": 1, "name": "Klepon", "price": 7_000, "stock": 0 }), "stock must be positive"),
            (json!({ "category_id": 1, "name": "", "price": 7_000, "stock": 5 }), "name is required"),
        ] {
            let (status, err) = send(&router, json("POST", "/api/product", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(err["message"], message);
        }

        let (status, err) = send(
            &router,
            json("POST", "/api/product", json!({ "category_id": 77, "name": "Klepon", "price": 7_000, "stock": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(err["message"].as_str().unwrap().contains("category_id 77"));

        let (status, _) = send(&router, json("POST", "/api/product", json!({ "name": "Klepon" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_sold_product_cannot_be_deleted() {
        let (router, db) = app().await;
        let id = seed_product(&db, "Tahu Crispy", 7_000, 10).await;

        let (status, _) = send(
            &router,
            json("POST", "/api/checkout", json!({ "items": [{ "product_id": id, "quantity": 1 }] })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&router, delete(&format!("/api/product/{id}"))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");
        assert!(db.products().get_by_id(id).await.unwrap().is_some());
    }
}
