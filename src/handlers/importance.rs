//! Feature importance handler

use axum::{extract::{Path, State}, Json};

use crate::{AppResult, AppState};
use crate::models::FeatureImportanceResponse;

pub async fn get(
    State(state): State<AppState>,
    Path(model_name): Path<String>,
) -> AppResult<Json<FeatureImportanceResponse>> {
    let ranking = state.registry.feature_importance(&model_name)?;

    let stats = state.registry.cache_stats();
    tracing::debug!("Importance cache: {} hits, {} misses", stats.hits, stats.misses);

    Ok(Json(FeatureImportanceResponse {
        model_name,
        ranking: (*ranking).clone(),
    }))
}
