//! Decision tree traversal
//!
//! Trees are stored flat: `nodes[0]` is the root, split nodes point at
//! their children by index.

use serde::Deserialize;

use crate::features::{FeatureVector, FEATURE_COUNT};
use super::error::{LoadError, ScoringError};

/// Which side of the threshold a sample equal to it goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitRule {
    /// `x <= threshold` goes left (scikit-learn)
    LessEqual,
    /// `x < threshold` goes left (XGBoost)
    Less,
}

impl SplitRule {
    fn goes_left(self, value: f64, threshold: f64) -> bool {
        match self {
            Self::LessEqual => value <= threshold,
            Self::Less => value < threshold,
        }
    }
}

/// A single tree node
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// Flat decision tree
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    /// Check node references and values once, at load time
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.nodes.is_empty() {
            return Err(LoadError::Invalid("empty tree".to_string()));
        }

        let len = self.nodes.len();
        for (i, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split { feature, threshold, left, right } => {
                    if feature >= FEATURE_COUNT {
                        return Err(LoadError::Invalid(format!(
                            "node {} splits on feature {} (only {} features)",
                            i, feature, FEATURE_COUNT
                        )));
                    }
                    if left >= len || right >= len {
                        return Err(LoadError::Invalid(format!(
                            "node {} has child outside the tree", i
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(LoadError::Invalid(format!(
                            "node {} has non-finite threshold", i
                        )));
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(LoadError::Invalid(format!(
                            "leaf {} has non-finite value", i
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Walk from the root to a leaf and return its value
    pub fn leaf_value(&self, x: &FeatureVector, rule: SplitRule) -> Result<f64, ScoringError> {
        let mut index = 0;

        // A well-formed tree reaches a leaf in fewer steps than it has nodes
        for _ in 0..=self.nodes.len() {
            let node = self.nodes.get(index).ok_or(ScoringError::NodeIndex(index))?;
            match *node {
                TreeNode::Leaf { value } => return Ok(value),
                TreeNode::Split { feature, threshold, left, right } => {
                    let value = x.get(feature).ok_or(ScoringError::FeatureIndex(feature))?;
                    index = if rule.goes_left(value, threshold) { left } else { right };
                }
            }
        }

        Err(ScoringError::Cycle)
    }
}
