//! Model serving errors

use thiserror::Error;

use crate::features::LayoutMismatchError;

/// Failure to turn an artifact file into a usable classifier
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("File not found")]
    NotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid artifact: {0}")]
    Invalid(String),

    #[error("{0}")]
    Layout(#[from] LayoutMismatchError),
}

/// Failure inside a classifier's scoring call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("feature index {0} out of range")]
    FeatureIndex(usize),

    #[error("node index {0} out of range")]
    NodeIndex(usize),

    #[error("tree traversal did not reach a leaf")]
    Cycle,

    #[error("non-finite score {0}")]
    NonFinite(f64),

    #[error("{0}")]
    Other(String),
}

/// Errors surfaced by registry operations
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Model {0} not found")]
    NotFound(String),

    #[error("Feature importance not available for {0}")]
    Unsupported(String),

    #[error("Prediction with {model} failed: {source}")]
    Scoring {
        model: String,
        #[source]
        source: ScoringError,
    },
}
