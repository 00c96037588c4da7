use crate::core::summary::{self, SummaryRequest};
use crate::domain::model::{LatestRate, Report};
use crate::server::{error::AppError, AppState};
use crate::utils::validation::require_param;
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    pub start: Option<String>,
    pub end: Option<String>,
    pub breakdown: Option<String>,
}

/// # GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "service": "fx-summary",
        "cache": state.client.cache_stats(),
    }))
}

/// # GET /summary?start=YYYY-MM-DD&end=YYYY-MM-DD&breakdown=day|none
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SummaryParams>,
) -> Result<Json<Report>, AppError> {
    let start = require_param("start", params.start.as_deref())?;
    let end = require_param("end", params.end.as_deref())?;
    let request = SummaryRequest::parse(start, end, params.breakdown.as_deref())?;
    let report = summary::build_summary(&state.client, &state.pair, &request).await?;
    Ok(Json(report))
}

/// # GET /latest
pub async fn get_latest(State(state): State<Arc<AppState>>) -> Result<Json<LatestRate>, AppError> {
    let latest = summary::build_latest(&state.client, &state.pair).await?;
    Ok(Json(latest))
}
