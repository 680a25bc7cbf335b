use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::AppState;

pub async fn root(state: State<AppState>) -> impl IntoResponse {
    health_check(state).await
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    if state.db.health_check().await {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "message": "Kasir API is running",
                "database": "connected"
            })),
        )
    } else {
        tracing::error!("Health check failed: database unreachable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "message": "Kasir API is running without a database",
                "database": "disconnected"
            })),
        )
    }
}
