//! Model Registry
//!
//! Owns every served classifier for the lifetime of the process. Built once
//! at startup by [`ModelRegistry::load_all`], then shared read-only between
//! request handlers. The only interior mutation is the importance cache.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::features::{FeatureVector, FEATURE_COUNT, FEATURE_LAYOUT};
use super::artifact::{Artifact, Classifier};
use super::cache::{BoundedCache, CacheStats};
use super::confidence::{decide, Confidence};
use super::error::{LoadError, RegistryError, ScoringError};

/// Number of entries in `top_features`
pub const TOP_FEATURES: usize = 5;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Per-model metadata, fixed at load time
#[derive(Debug, Clone, Serialize)]
pub struct ModelMetadata {
    #[serde(rename = "type")]
    pub type_tag: String,
    pub has_feature_importance: bool,
    pub loaded_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

struct ModelEntry {
    classifier: Box<dyn Classifier>,
    metadata: ModelMetadata,
}

/// Outcome of a startup load
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub failures: Vec<(String, String)>,
}

/// Single-row prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Positive-class probability, in [0, 1]
    pub probability: f64,
    /// 1 iff `probability >= 0.5`
    pub prediction: u8,
    pub confidence: Confidence,
}

/// Importance ranking for one model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    /// Every feature, highest score first
    pub feature_importance: IndexMap<String, f64>,
    /// The first `TOP_FEATURES` entries of `feature_importance`
    pub top_features: Vec<(String, f64)>,
}

impl FeatureImportance {
    /// Zip raw scores with the layout and sort descending.
    /// Ties keep layout order.
    pub fn rank(raw: &[f64]) -> Self {
        let mut pairs: Vec<(String, f64)> = FEATURE_LAYOUT
            .iter()
            .map(|name| name.to_string())
            .zip(raw.iter().copied())
            .collect();

        pairs.sort_by(|a, b| b.1.total_cmp(&a.1));

        let top_features = pairs.iter().take(TOP_FEATURES).cloned().collect();

        Self {
            feature_importance: pairs.into_iter().collect(),
            top_features,
        }
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

pub struct ModelRegistry {
    entries: IndexMap<String, ModelEntry>,
    importance_cache: BoundedCache<FeatureImportance>,
    cache_capacity: usize,
}

impl ModelRegistry {
    pub fn new(cache_capacity: usize) -> Self {
        Self {
            entries: IndexMap::new(),
            importance_cache: BoundedCache::new(cache_capacity),
            cache_capacity,
        }
    }

    /// Load every configured artifact. A missing or broken file is recorded
    /// in the report and skipped; it never aborts the rest of the load.
    pub fn load_all(&mut self, models_dir: &Path, table: &[(&str, &str)]) -> LoadReport {
        let mut report = LoadReport::default();

        for (name, file) in table {
            let path = models_dir.join(file);
            tracing::info!("Loading {} from {}", name, path.display());

            match load_artifact(&path) {
                Ok((artifact, checksum)) => {
                    tracing::info!("Loaded {} ({})", name, artifact.type_name());
                    if !self.insert(name, Box::new(artifact), Some(checksum)) {
                        report.loaded += 1;
                    }
                }
                Err(e) => {
                    match &e {
                        LoadError::NotFound => {
                            tracing::warn!("Model file not found: {}", path.display())
                        }
                        other => tracing::error!("Failed to load {}: {}", name, other),
                    }
                    report.failures.push((name.to_string(), e.to_string()));
                }
            }
        }

        report
    }

    /// Register a classifier under `name`, replacing any previous one.
    /// Returns `true` if an existing entry was replaced.
    ///
    /// Importance capability is probed here, once. A signal that is not one
    /// score per layout feature counts as no signal.
    pub fn insert(&mut self, name: &str, classifier: Box<dyn Classifier>, sha256: Option<String>) -> bool {
        let has_feature_importance = match classifier.importances() {
            Some(raw) if raw.len() == FEATURE_COUNT => true,
            Some(raw) => {
                tracing::warn!(
                    "Model {} reports {} importance scores, expected {}; importance disabled",
                    name,
                    raw.len(),
                    FEATURE_COUNT
                );
                false
            }
            None => false,
        };

        let metadata = ModelMetadata {
            type_tag: classifier.type_name().to_string(),
            has_feature_importance,
            loaded_at: Utc::now(),
            sha256,
        };

        let previous = self.entries.insert(name.to_string(), ModelEntry { classifier, metadata });
        if previous.is_some() {
            tracing::warn!("Model {} registered twice, keeping the latest", name);
            // Rankings computed for the replaced model are stale
            self.importance_cache = BoundedCache::new(self.cache_capacity);
        }

        previous.is_some()
    }

    /// Score one row with the named model
    pub fn predict(&self, name: &str, x: &FeatureVector) -> Result<Prediction, RegistryError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;

        let scoring_error = |source: ScoringError| RegistryError::Scoring {
            model: name.to_string(),
            source,
        };

        let probability = entry.classifier.predict_proba(x).map_err(scoring_error)?;

        if !probability.is_finite() {
            return Err(scoring_error(ScoringError::NonFinite(probability)));
        }
        if !(0.0..=1.0).contains(&probability) {
            return Err(scoring_error(ScoringError::Other(format!(
                "probability {} outside [0, 1]",
                probability
            ))));
        }

        tracing::debug!(model = name, probability, "Prediction computed");

        Ok(Prediction {
            probability,
            prediction: decide(probability),
            confidence: Confidence::from_probability(probability),
        })
    }

    /// Ranked feature importance for the named model, memoized per name
    pub fn feature_importance(&self, name: &str) -> Result<Arc<FeatureImportance>, RegistryError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;

        if !entry.metadata.has_feature_importance {
            return Err(RegistryError::Unsupported(name.to_string()));
        }

        self.importance_cache.get_or_try_insert_with(name, || {
            entry
                .classifier
                .importances()
                .map(|raw| FeatureImportance::rank(&raw))
                .ok_or_else(|| RegistryError::Unsupported(name.to_string()))
        })
    }

    /// Model names in load order
    pub fn list_names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn metadata(&self) -> IndexMap<String, ModelMetadata> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.clone(), entry.metadata.clone()))
            .collect()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.importance_cache.stats()
    }
}

/// Read an artifact file, returning it with the hex SHA-256 of its bytes
fn load_artifact(path: &Path) -> Result<(Artifact, String), LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound);
    }

    let bytes = std::fs::read(path)?;
    let checksum = hex::encode(Sha256::digest(&bytes));
    let artifact = Artifact::from_slice(&bytes)?;

    Ok((artifact, checksum))
}

// ============================================================================
// TESTS
// ============================================================================
