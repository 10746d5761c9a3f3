//! Model artifacts
//!
//! Artifacts are JSON documents tagged by `kind`. Each variant knows how to
//! score a single row and whether it carries a per-feature importance signal.
//!
//! ```json
//! {"kind": "logistic_regression", "coef": [...8 values], "intercept": -0.3}
//! {"kind": "xgboost", "base_score": 0.5, "trees": [{"nodes": [...]}]}
//! ```

use serde::Deserialize;

use crate::features::{layout::validate_layout, FeatureVector, FEATURE_COUNT};
use super::error::{LoadError, ScoringError};
use super::tree::{SplitRule, Tree, TreeNode};

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Anything the registry can serve
pub trait Classifier: Send + Sync {
    /// Implementation name reported in model metadata
    fn type_name(&self) -> &str;

    /// Positive-class (churn) probability for one row
    fn predict_proba(&self, x: &FeatureVector) -> Result<f64, ScoringError>;

    /// Raw per-feature importance in layout order, if the model exposes one
    fn importances(&self) -> Option<Vec<f64>>;
}

// ============================================================================
// ARTIFACT VARIANTS
// ============================================================================

/// Standardization applied before a linear model
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogisticRegression {
    pub coef: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RandomForest {
    pub trees: Vec<Tree>,
    #[serde(default)]
    pub feature_importances: Option<Vec<f64>>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GradientBoosting {
    pub init_score: f64,
    pub learning_rate: f64,
    pub trees: Vec<Tree>,
    #[serde(default)]
    pub feature_importances: Option<Vec<f64>>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct XGBoost {
    /// Prior probability, converted to a margin before summing trees
    #[serde(default = "default_base_score")]
    pub base_score: f64,
    pub trees: Vec<Tree>,
    #[serde(default)]
    pub feature_importances: Option<Vec<f64>>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

fn default_base_score() -> f64 {
    0.5
}

/// Deserialized model artifact
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind")]
pub enum Artifact {
    #[serde(rename = "logistic_regression")]
    LogisticRegression(LogisticRegression),
    #[serde(rename = "random_forest")]
    RandomForest(RandomForest),
    #[serde(rename = "gradient_boosting")]
    GradientBoosting(GradientBoosting),
    #[serde(rename = "xgboost")]
    XGBoost(XGBoost),
}

impl Artifact {
    /// Parse and validate an artifact from raw bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, LoadError> {
        let artifact: Artifact = serde_json::from_slice(bytes)?;
        artifact.validate()?;
        Ok(artifact)
    }

    fn feature_names(&self) -> Option<&[String]> {
        match self {
            Self::LogisticRegression(m) => m.feature_names.as_deref(),
            Self::RandomForest(m) => m.feature_names.as_deref(),
            Self::GradientBoosting(m) => m.feature_names.as_deref(),
            Self::XGBoost(m) => m.feature_names.as_deref(),
        }
    }

    fn trees(&self) -> &[Tree] {
        match self {
            Self::LogisticRegression(_) => &[],
            Self::RandomForest(m) => &m.trees,
            Self::GradientBoosting(m) => &m.trees,
            Self::XGBoost(m) => &m.trees,
        }
    }

    fn declared_importances(&self) -> Option<&[f64]> {
        match self {
            Self::LogisticRegression(_) => None,
            Self::RandomForest(m) => m.feature_importances.as_deref(),
            Self::GradientBoosting(m) => m.feature_importances.as_deref(),
            Self::XGBoost(m) => m.feature_importances.as_deref(),
        }
    }

    /// Structural checks so scoring never sees a malformed model
    pub fn validate(&self) -> Result<(), LoadError> {
        if let Some(names) = self.feature_names() {
            validate_layout(names)?;
        }

        if let Some(importances) = self.declared_importances() {
            check_per_feature("feature_importances", importances)?;
        }

        match self {
            Self::LogisticRegression(m) => {
                check_per_feature("coef", &m.coef)?;
                check_finite("intercept", m.intercept)?;
                if let Some(scaler) = &m.scaler {
                    check_per_feature("scaler.mean", &scaler.mean)?;
                    check_per_feature("scaler.scale", &scaler.scale)?;
                    if scaler.scale.iter().any(|s| *s == 0.0) {
                        return Err(LoadError::Invalid("scaler.scale contains zero".to_string()));
                    }
                }
            }
            Self::RandomForest(m) => {
                for tree in &m.trees {
                    let out_of_range = tree.nodes.iter().any(|n| {
                        matches!(n, TreeNode::Leaf { value } if !(0.0..=1.0).contains(value))
                    });
                    if out_of_range {
                        return Err(LoadError::Invalid(
                            "random forest leaf outside [0, 1]".to_string(),
                        ));
                    }
                }
            }
            Self::GradientBoosting(m) => {
                check_finite("init_score", m.init_score)?;
                check_finite("learning_rate", m.learning_rate)?;
            }
            Self::XGBoost(m) => {
                if !(m.base_score > 0.0 && m.base_score < 1.0) {
                    return Err(LoadError::Invalid("base_score must be in (0, 1)".to_string()));
                }
            }
        }

        if !matches!(self, Self::LogisticRegression(_)) && self.trees().is_empty() {
            return Err(LoadError::Invalid("ensemble has no trees".to_string()));
        }
        for tree in self.trees() {
            tree.validate()?;
        }

        Ok(())
    }
}

fn check_finite(field: &str, value: f64) -> Result<(), LoadError> {
    if !value.is_finite() {
        return Err(LoadError::Invalid(format!("{} is not finite", field)));
    }
    Ok(())
}

fn check_per_feature(field: &str, values: &[f64]) -> Result<(), LoadError> {
    if values.len() != FEATURE_COUNT {
        return Err(LoadError::Invalid(format!(
            "{} has {} values, expected {}",
            field,
            values.len(),
            FEATURE_COUNT
        )));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(LoadError::Invalid(format!("{} contains non-finite values", field)));
    }
    Ok(())
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn sum_leaves(trees: &[Tree], x: &FeatureVector, rule: SplitRule) -> Result<f64, ScoringError> {
    trees.iter().try_fold(0.0, |acc, tree| Ok(acc + tree.leaf_value(x, rule)?))
}

impl Classifier for Artifact {
    fn type_name(&self) -> &str {
        match self {
            Self::LogisticRegression(_) => "LogisticRegression",
            Self::RandomForest(_) => "RandomForestClassifier",
            Self::GradientBoosting(_) => "GradientBoostingClassifier",
            Self::XGBoost(_) => "XGBClassifier",
        }
    }

    fn predict_proba(&self, x: &FeatureVector) -> Result<f64, ScoringError> {
        let p = match self {
            Self::LogisticRegression(m) => {
                let mut z = m.intercept;
                for (i, (coef, value)) in m.coef.iter().zip(x.as_array()).enumerate() {
                    let value = match &m.scaler {
                        Some(s) => (value - s.mean[i]) / s.scale[i],
                        None => *value,
                    };
                    z += coef * value;
                }
                sigmoid(z)
            }
            Self::RandomForest(m) => {
                sum_leaves(&m.trees, x, SplitRule::LessEqual)? / m.trees.len() as f64
            }
            Self::GradientBoosting(m) => {
                let raw = sum_leaves(&m.trees, x, SplitRule::LessEqual)?;
                sigmoid(m.init_score + m.learning_rate * raw)
            }
            Self::XGBoost(m) => {
                let base_margin = (m.base_score / (1.0 - m.base_score)).ln();
                sigmoid(base_margin + sum_leaves(&m.trees, x, SplitRule::Less)?)
            }
        };

        if !p.is_finite() {
            return Err(ScoringError::NonFinite(p));
        }
        Ok(p)
    }

    fn importances(&self) -> Option<Vec<f64>> {
        match self {
            Self::LogisticRegression(m) => Some(m.coef.iter().map(|c| c.abs()).collect()),
            _ => self.declared_importances().map(|i| i.to_vec()),
        }
    }
}
