//! Model Module - Serving core
//!
//! Artifact formats, the registry that owns loaded models, confidence
//! banding, the importance cache and reference-data range statistics.

pub mod artifact;
pub mod cache;
pub mod confidence;
pub mod error;
pub mod ranges;
pub mod registry;
pub mod tree;

// Re-export common types
pub use artifact::{Artifact, Classifier};
pub use confidence::Confidence;
pub use error::{LoadError, RegistryError, ScoringError};
pub use ranges::{FeatureRanges, FeatureStats};
pub use registry::{FeatureImportance, LoadReport, ModelMetadata, ModelRegistry, Prediction};
