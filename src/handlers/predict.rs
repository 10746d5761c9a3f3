//! Prediction handler

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use validator::Validate;

use crate::{AppResult, AppState};
use crate::models::{PredictionRequest, PredictionResponse};

/// Score one customer with the named model.
///
/// Body validation happens before the model lookup, so an invalid body is
/// rejected even for an unknown model and never reaches the registry.
pub async fn predict(
    State(state): State<AppState>,
    Path(model_name): Path<String>,
    body: Result<Json<PredictionRequest>, JsonRejection>,
) -> AppResult<Json<PredictionResponse>> {
    let Json(req) = body?;
    req.validate()?;

    let result = state.registry.predict(&model_name, &req.to_features())?;

    Ok(Json(PredictionResponse::new(&model_name, result)))
}
