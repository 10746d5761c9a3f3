//! Service status models

use indexmap::IndexMap;
use serde::Serialize;

use crate::ml::ModelMetadata;

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub status: &'static str,
    pub models: usize,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub models: usize,
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub available_models: Vec<String>,
    pub total: usize,
    pub metadata: IndexMap<String, ModelMetadata>,
}
