//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the input schema**
//!
//! The order below is the training-time column order. Every artifact
//! indexes features by position, so reordering this list silently breaks
//! every model and every importance ranking.

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    "price",                        // 0: Product price
    "freight_value",                // 1: Freight cost
    "payment_installments",         // 2: Number of payment installments
    "delivery_diff_than_estimated", // 3: Delivery delay vs. estimate, in days
    "reviewed_days",                // 4: Days until the review was written
    "customer_state_enc",           // 5: Target-encoded customer state
    "product_category_name_enc",    // 6: Encoded product category
    "payment_type_enc",             // 7: Encoded payment type
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 8;

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when an artifact's declared feature names don't match the layout
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutMismatchError {
    pub expected: Vec<String>,
    pub actual: Vec<String>,
}

impl std::fmt::Display for LayoutMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Feature layout mismatch: expected [{}], got [{}]",
            self.expected.join(", "),
            self.actual.join(", ")
        )
    }
}

impl std::error::Error for LayoutMismatchError {}

/// Validate that a declared feature list matches the current layout exactly
pub fn validate_layout(names: &[String]) -> Result<(), LayoutMismatchError> {
    let matches = names.len() == FEATURE_COUNT
        && names.iter().zip(FEATURE_LAYOUT).all(|(a, b)| a == b);

    if !matches {
        return Err(LayoutMismatchError {
            expected: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
            actual: names.to_vec(),
        });
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_validate_layout_success() {
        let names: Vec<String> = FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect();
        assert!(validate_layout(&names).is_ok());
    }

    #[test]
    fn test_validate_layout_reordered() {
        let mut names: Vec<String> = FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect();
        names.swap(0, 1);
        let err = validate_layout(&names).unwrap_err();
        assert_eq!(err.actual[0], "freight_value");
    }

    #[test]
    fn test_validate_layout_truncated() {
        let names = vec!["price".to_string()];
        assert!(validate_layout(&names).is_err());
    }
}
