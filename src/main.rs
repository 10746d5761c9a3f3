//! Churn Prediction API server

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use churn_serving::{
    config::Config,
    create_router,
    ml::{FeatureRanges, ModelRegistry},
    settings::MODEL_FILES,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "churn_serving=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Churn Prediction API v{} starting...", config.api_version());
    tracing::info!("Models directory: {}", config.models_dir.display());

    // Load model artifacts
    let mut models = ModelRegistry::new(config.importance_cache_capacity);
    let report = models.load_all(&config.models_dir, MODEL_FILES);
    tracing::info!("Loaded {}/{} models", report.loaded, MODEL_FILES.len());
    if !report.failures.is_empty() {
        let names: Vec<&str> = report.failures.iter().map(|(name, _)| name.as_str()).collect();
        tracing::warn!("Unavailable models: {}", names.join(", "));
    }

    // Sample reference data for input bounds
    let ranges = FeatureRanges::load(&config.reference_data_path, config.sample_size);

    let state = AppState::new(models, ranges, config.clone());
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
