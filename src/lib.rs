//! Churn Prediction API
//!
//! Serves pre-trained churn classifiers over HTTP.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    CHURN SERVING                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────────┐  ┌─────────────────────┐ │
//! │  │  API      │  │  Model        │  │  Feature Ranges     │ │
//! │  │  Gateway  │─▶│  Registry     │  │  (reference CSV)    │ │
//! │  │  (Axum)   │  │  + Importance │  │                     │ │
//! │  └───────────┘  │    Cache      │  └─────────────────────┘ │
//! │                 └───────┬───────┘                           │
//! │                         ▼                                   │
//! │                ┌─────────────────┐                          │
//! │                │ JSON artifacts  │                          │
//! │                └─────────────────┘                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod features;
pub mod handlers;
pub mod ml;
pub mod models;
pub mod settings;

use std::sync::Arc;

use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::{
        predicate::{Predicate, SizeAbove},
        CompressionLayer, DefaultPredicate,
    },
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use error::{AppError, AppResult};

use config::Config;
use ml::{FeatureRanges, ModelRegistry};

/// Shared application state
///
/// Everything here is read-only once the server starts.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ModelRegistry>,
    pub feature_ranges: Option<Arc<FeatureRanges>>,
    pub config: Config,
}

impl AppState {
    pub fn new(registry: ModelRegistry, feature_ranges: Option<FeatureRanges>, config: Config) -> Self {
        Self {
            registry: Arc::new(registry),
            feature_ranges: feature_ranges.map(Arc::new),
            config,
        }
    }
}

/// Responses smaller than this are sent uncompressed
pub const MIN_COMPRESS_SIZE: u16 = 1000;

fn compression_predicate() -> impl Predicate {
    DefaultPredicate::new().and(SizeAbove::new(MIN_COMPRESS_SIZE))
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::check))
        .route("/models", get(handlers::models::list))
        .route("/feature-ranges", get(handlers::ranges::get))
        .route("/model-performance", get(handlers::models::performance))
        .route("/predict/:model_name", post(handlers::predict::predict))
        .route("/feature-importance/:model_name", get(handlers::importance::get))
        .fallback(handlers::fallback::not_found)
        .layer(CompressionLayer::new().compress_when(compression_predicate()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers(Any)
        )
        .with_state(state)
}
