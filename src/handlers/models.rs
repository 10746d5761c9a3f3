//! Model catalogue handlers

use axum::{extract::State, Json};
use indexmap::IndexMap;

use crate::AppState;
use crate::models::ModelsResponse;
use crate::settings::{model_performance, ModelPerformance};

/// List loaded models with their metadata
pub async fn list(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        available_models: state.registry.list_names(),
        total: state.registry.count(),
        metadata: state.registry.metadata(),
    })
}

/// Precomputed train/test metrics
pub async fn performance() -> Json<IndexMap<&'static str, ModelPerformance>> {
    Json(model_performance())
}
