//! Static serving settings
//!
//! Model table and the precomputed evaluation metrics reported by
//! `/model-performance`. These never change at runtime.

use indexmap::IndexMap;
use serde::Serialize;

/// Served models in registration order: (name, artifact file under `MODELS_DIR`)
pub const MODEL_FILES: &[(&str, &str)] = &[
    ("XGBoost", "xgboost_grid.json"),
    ("GradientBoosting", "gradient_boosting.json"),
    ("RandomForest", "random_forest.json"),
    ("LogisticRegression", "logistic_regression.json"),
];

/// Metrics for one data split
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SplitMetrics {
    pub roc_auc: f64,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub confusion_matrix: [[u32; 2]; 2],
}

/// Train/test metrics for one model
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModelPerformance {
    pub test: SplitMetrics,
    pub train: SplitMetrics,
}

/// Evaluation results recorded when the artifacts were trained
pub fn model_performance() -> IndexMap<&'static str, ModelPerformance> {
    let mut table = IndexMap::new();

    table.insert("XGBoost", ModelPerformance {
        test: SplitMetrics {
            roc_auc: 0.8826,
            accuracy: 0.8614,
            precision: 0.8683,
            recall: 0.9753,
            confusion_matrix: [[1816, 2749], [459, 18120]],
        },
        train: SplitMetrics {
            roc_auc: 0.9003,
            accuracy: 0.8698,
            precision: 0.8729,
            recall: 0.9805,
            confusion_matrix: [[7654, 10606], [1446, 72870]],
        },
    });

    table.insert("GradientBoosting", ModelPerformance {
        test: SplitMetrics {
            roc_auc: 0.8775,
            accuracy: 0.8618,
            precision: 0.8657,
            recall: 0.9799,
            confusion_matrix: [[1740, 2825], [374, 18205]],
        },
        train: SplitMetrics {
            roc_auc: 0.8925,
            accuracy: 0.8689,
            precision: 0.8689,
            recall: 0.9854,
            confusion_matrix: [[7208, 11052], [1088, 73228]],
        },
    });

    table.insert("RandomForest", ModelPerformance {
        test: SplitMetrics {
            roc_auc: 0.8285,
            accuracy: 0.7466,
            precision: 0.9183,
            recall: 0.7512,
            confusion_matrix: [[3323, 1242], [4623, 13956]],
        },
        train: SplitMetrics {
            roc_auc: 0.9999,
            accuracy: 0.9996,
            precision: 0.9999,
            recall: 0.9996,
            confusion_matrix: [[18251, 9], [27, 74289]],
        },
    });

    table.insert("LogisticRegression", ModelPerformance {
        test: SplitMetrics {
            roc_auc: 0.5791,
            accuracy: 0.5463,
            precision: 0.8265,
            recall: 0.5504,
            confusion_matrix: [[2418, 2147], [8354, 10225]],
        },
        train: SplitMetrics {
            roc_auc: 0.5768,
            accuracy: 0.5461,
            precision: 0.8269,
            recall: 0.5497,
            confusion_matrix: [[9709, 8551], [33465, 40851]],
        },
    });

    table
}
