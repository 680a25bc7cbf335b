use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;

use kasir_core::Transaction;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// `GET /api/transaction/{id}`: a recorded sale with its details.
pub async fn get_transaction(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Transaction>> {
    let Path(id) = id?;
    state
        .db
        .transactions()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Transaction", id))
}
