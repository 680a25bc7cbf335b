//! Sales report endpoints.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use kasir_core::validation::parse_report_date;
use kasir_core::{ReportWindow, TransactionReport};

use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// `GET /api/report/today`
pub async fn today(State(state): State<AppState>) -> ApiResult<Json<TransactionReport>> {
    let report = state.db.reports().today().await?;
    Ok(Json(report))
}

/// `GET /api/report?start_date=YYYY-MM-DD&end_date=YYYY-MM-DD`
///
/// Both bounds are required and inclusive.
pub async fn range(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> ApiResult<Json<TransactionReport>> {
    let Query(query) = query?;

    let start = parse_report_date("start_date", query.start_date.as_deref().unwrap_or_default())?;
    let end = parse_report_date("end_date", query.end_date.as_deref().unwrap_or_default())?;
    let window = ReportWindow::for_dates(start, end)?;

    let report = state.db.reports().for_window(window).await?;
    Ok(Json(report))
}
