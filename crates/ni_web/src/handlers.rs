use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use ni_core::{AnalysisRequest, ImpactReport};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::AppState;

pub async fn news_impact(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<ImpactReport>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected news impact request: {}", rejection.body_text());
        ApiError::from(rejection)
    })?;

    info!("News impact requested for {} with {}", request.url, request.model);
    let report = state.analyzer.analyze(&request.url, &request.model).await?;
    Ok(Json(report))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
