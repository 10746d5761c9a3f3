//! Prediction request/response models

use serde::{de, Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::features::FeatureVector;
use crate::ml::{Confidence, Prediction};

/// Raw model input. Every field has an inclusive accepted range.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PredictionRequest {
    #[validate(range(min = 0.0, max = 10000.0, message = "price must be between 0 and 10000"))]
    pub price: f64,

    #[validate(range(min = 0.0, max = 500.0, message = "freight_value must be between 0 and 500"))]
    pub freight_value: f64,

    #[serde(deserialize_with = "integral")]
    #[validate(range(min = 0, max = 24, message = "payment_installments must be between 0 and 24"))]
    pub payment_installments: i64,

    #[serde(deserialize_with = "integral")]
    #[validate(range(min = -50, max = 200, message = "delivery_diff_than_estimated must be between -50 and 200"))]
    pub delivery_diff_than_estimated: i64,

    #[serde(deserialize_with = "integral")]
    #[validate(range(min = 0, max = 150, message = "reviewed_days must be between 0 and 150"))]
    pub reviewed_days: i64,

    #[validate(range(min = 0.0, max = 1.0, message = "customer_state_enc must be between 0 and 1"))]
    pub customer_state_enc: f64,

    #[serde(deserialize_with = "integral")]
    #[validate(range(min = 0, max = 15000, message = "product_category_name_enc must be between 0 and 15000"))]
    pub product_category_name_enc: i64,

    #[serde(deserialize_with = "integral")]
    #[validate(range(min = 0, max = 3, message = "payment_type_enc must be between 0 and 3"))]
    pub payment_type_enc: i64,
}

impl PredictionRequest {
    /// Model input in layout order
    pub fn to_features(&self) -> FeatureVector {
        FeatureVector::from_values([
            self.price,
            self.freight_value,
            self.payment_installments as f64,
            self.delivery_diff_than_estimated as f64,
            self.reviewed_days as f64,
            self.customer_state_enc,
            self.product_category_name_enc as f64,
            self.payment_type_enc as f64,
        ])
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionResponse {
    pub model_name: String,
    pub churn_probability: f64,
    pub prediction: u8,
    pub confidence: Confidence,
}

impl PredictionResponse {
    pub fn new(model_name: &str, result: Prediction) -> Self {
        Self {
            model_name: model_name.to_string(),
            churn_probability: round4(result.probability),
            prediction: result.prediction,
            confidence: result.confidence,
        }
    }
}

/// Accept `3` or `3.0` for an integer field, reject `3.5`
fn integral<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value.fract() != 0.0 || value.abs() > MAX_EXACT_INTEGER {
        return Err(de::Error::invalid_value(de::Unexpected::Float(value), &"an integer"));
    }
    Ok(value as i64)
}

/// Largest integer magnitude an f64 holds exactly (2^53)
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Round to 4 decimal places for display
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
