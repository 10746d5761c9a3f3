//! Error handling

use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::ml::RegistryError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Resource errors
    NotFound(String),

    // Client errors
    ValidationError(String),
    Unsupported(String),

    // Model errors
    PredictionFailed(String),
    FeatureRangesUnavailable,
}

impl AppError {
    /// Stable, machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::ValidationError(_) => "validation_error",
            AppError::Unsupported(_) => "unsupported",
            AppError::PredictionFailed(_) => "prediction_failed",
            AppError::FeatureRangesUnavailable => "feature_ranges_unavailable",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.as_str()),
            AppError::ValidationError(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.as_str()),
            AppError::Unsupported(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::PredictionFailed(msg) => {
                tracing::error!("Prediction error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Prediction failed")
            }
            AppError::FeatureRangesUnavailable => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Feature ranges not loaded")
            }
        };

        let body = Json(json!({
            "error": self.kind(),
            "message": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(_) => AppError::NotFound("Model not found".to_string()),
            RegistryError::Unsupported(_) => {
                AppError::Unsupported("Feature importance not available".to_string())
            }
            scoring @ RegistryError::Scoring { .. } => {
                AppError::PredictionFailed(scoring.to_string())
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(errors.to_string())
    }
}
