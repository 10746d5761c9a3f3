//! Feature range handler

use axum::{extract::State, Json};

use crate::{AppError, AppResult, AppState};
use crate::ml::FeatureRanges;

pub async fn get(State(state): State<AppState>) -> AppResult<Json<FeatureRanges>> {
    state
        .feature_ranges
        .as_deref()
        .cloned()
        .map(Json)
        .ok_or(AppError::FeatureRangesUnavailable)
}
