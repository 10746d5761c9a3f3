//! Configuration module

use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Directory holding the serialized model artifacts
    pub models_dir: PathBuf,

    /// Reference CSV sampled for feature range statistics
    pub reference_data_path: PathBuf,

    /// Maximum number of reference rows read at startup
    pub sample_size: usize,

    /// Capacity of the feature importance cache
    pub importance_cache_capacity: usize,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            models_dir: PathBuf::from("saved_models"),
            reference_data_path: PathBuf::from("x_test.csv"),
            sample_size: 1000,
            importance_cache_capacity: 32,
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            models_dir: env::var("MODELS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.models_dir),

            reference_data_path: env::var("REFERENCE_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.reference_data_path),

            sample_size: env::var("SAMPLE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.sample_size),

            importance_cache_capacity: env::var("IMPORTANCE_CACHE_CAPACITY")
                .ok()
                .and_then(|c| c.parse().ok())
                .unwrap_or(defaults.importance_cache_capacity),

            environment: env::var("ENVIRONMENT")
                .unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// API version reported by the root endpoint
    pub fn api_version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
