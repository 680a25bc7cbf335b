//! Category CRUD.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use kasir_core::validation::validate_category_input;
use kasir_core::{Category, CategoryInput};
use kasir_db::DbError;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.db.categories().list().await?))
}

pub async fn get_category(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Category>> {
    let Path(id) = id?;
    state
        .db
        .categories()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Category", id))
}

pub async fn create_category(
    State(state): State<AppState>,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let Json(input) = payload?;
    validate_category_input(&input)?;

    let category = state.db.categories().insert(&input).await?;
    tracing::info!(category_id = category.id, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> ApiResult<Json<Category>> {
    let Path(id) = id?;
    let Json(input) = payload?;
    validate_category_input(&input)?;

    Ok(Json(state.db.categories().update(id, &input).await?))
}

pub async fn delete_category(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;

    match state.db.categories().delete(id).await {
        Ok(()) => {
            tracing::info!(category_id = id, "Category deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(DbError::ForeignKeyViolation { .. }) => Err(ApiError::conflict(format!(
            "Category {id} still has products"
        ))),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{app, delete, get, json, seed_product, send};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_category_crud() {
        let (router, _db) = app().await;

        let (status, created) = send(
            &router,
            json("POST", "/api/category", json!({ "name": "Snack", "description": "Camilan" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_i64().unwrap();

        let (status, fetched) = send(&router, get(&format!("/api/category/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["name"], "Snack");

        let (status, updated) = send(
            &router,
            json("PUT", &format!("/api/category/{id}"), json!({ "name": "Snacks" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "Snacks");

        let (status, list) = send(&router, get("/api/category")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (status, _) = send(&router, delete(&format!("/api/category/{id}"))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&router, get(&format!("/api/category/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_category_validation_and_conflicts() {
        let (router, db) = app().await;

        let (status, body) = send(&router, json("POST", "/api/category", json!({ "name": "  " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "name is required");

        let (status, _) = send(&router, get("/api/category/abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&router, json("PUT", "/api/category/404", json!({ "name": "X" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        seed_product(&db, "Cireng", 5_000, 10).await;
        let category_id = db.categories().list().await.unwrap()[0].id;
        let (status, body) = send(&router, delete(&format!("/api/category/{category_id}"))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");
    }
}
