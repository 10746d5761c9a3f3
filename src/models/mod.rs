//! Request and response models

pub mod prediction;
pub mod service;
pub mod importance;

pub use prediction::*;
pub use service::*;
pub use importance::*;
