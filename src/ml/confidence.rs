//! Confidence banding
//!
//! Human-readable banding of the churn probability. Display only: the
//! binary prediction is always `probability >= DECISION_THRESHOLD`.

use serde::{Serialize, Serializer};

/// Probability at or above which a customer is predicted to churn
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Five-tier, asymmetric confidence band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    HighChurn,
    MediumChurn,
    Neutral,
    MediumNotChurn,
    HighNotChurn,
}

impl Confidence {
    /// Band a probability
    ///
    /// | probability | band |
    /// |---|---|
    /// | `> 0.9` | High Probability that it will Churn |
    /// | `> 0.8` | Medium Probability that it will Churn |
    /// | `<= 0.1` | High Probability that it will not Churn |
    /// | `< 0.2` | Medium Probability that it will not Churn |
    /// | otherwise | Low Confidence (Neutral) |
    pub fn from_probability(p: f64) -> Self {
        if p > 0.9 {
            Self::HighChurn
        } else if p > 0.8 {
            Self::MediumChurn
        } else if p <= 0.1 {
            Self::HighNotChurn
        } else if p < 0.2 {
            Self::MediumNotChurn
        } else {
            Self::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighChurn => "High Probability that it will Churn",
            Self::MediumChurn => "Medium Probability that it will Churn",
            Self::Neutral => "Low Confidence (Neutral)",
            Self::MediumNotChurn => "Medium Probability that it will not Churn",
            Self::HighNotChurn => "High Probability that it will not Churn",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Confidence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Binary churn decision
pub fn decide(p: f64) -> u8 {
    u8::from(p >= DECISION_THRESHOLD)
}
