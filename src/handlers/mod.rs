//! HTTP handlers

pub mod health;
pub mod models;
pub mod predict;
pub mod importance;
pub mod ranges;
pub mod fallback;
