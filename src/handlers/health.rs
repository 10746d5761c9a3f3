//! Health check handlers

use axum::{extract::State, Json};

use crate::AppState;
use crate::models::{HealthResponse, RootResponse};

/// Service banner
pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        status: "running",
        models: state.registry.count(),
        version: state.config.api_version(),
    })
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        models: state.registry.count(),
    })
}
