//! Feature importance response model

use serde::Serialize;

use crate::ml::FeatureImportance;

#[derive(Debug, Serialize)]
pub struct FeatureImportanceResponse {
    pub model_name: String,
    #[serde(flatten)]
    pub ranking: FeatureImportance,
}
