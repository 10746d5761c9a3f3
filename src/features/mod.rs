//! Features Module - Model input schema
//!
//! The fixed, ordered feature layout every artifact was trained on,
//! and the vector type built from validated requests.

pub mod layout;
pub mod vector;

// Re-export common types
pub use layout::{FEATURE_COUNT, FEATURE_LAYOUT, LayoutMismatchError};
pub use vector::FeatureVector;
