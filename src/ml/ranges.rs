//! Feature Range Loader
//!
//! Samples the head of the reference dataset once at startup and keeps
//! per-feature min/max/mean so clients can bound their inputs.

use std::fs::File;
use std::path::Path;

use indexmap::IndexMap;
use polars::prelude::*;
use serde::Serialize;

use crate::features::FEATURE_LAYOUT;

/// Summary statistics for one feature column
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Feature name → stats, in layout order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureRanges(IndexMap<String, FeatureStats>);

impl FeatureRanges {
    /// Read at most `sample_size` rows from `path`.
    ///
    /// Returns `None` when the file is missing, unreadable, or has none of
    /// the layout columns. Callers treat that as "bounds unavailable".
    pub fn load(path: &Path, sample_size: usize) -> Option<Self> {
        if !path.exists() {
            tracing::warn!("Reference data not found: {}", path.display());
            return None;
        }

        match Self::read(path, sample_size) {
            Ok(ranges) if !ranges.is_empty() => {
                tracing::info!("Loaded feature ranges for {} features", ranges.len());
                Some(ranges)
            }
            Ok(_) => {
                tracing::warn!("Reference data has no feature columns: {}", path.display());
                None
            }
            Err(e) => {
                tracing::warn!("Failed to load feature ranges: {}", e);
                None
            }
        }
    }

    fn read(path: &Path, sample_size: usize) -> PolarsResult<Self> {
        let file = File::open(path)?;

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_n_rows(Some(sample_size))
            .into_reader_with_file_handle(file)
            .finish()?;

        let mut stats = IndexMap::new();

        // Extra columns (e.g. a leading index column) are ignored
        for name in FEATURE_LAYOUT {
            let Ok(column) = df.column(name) else {
                continue;
            };
            let values = column.cast(&DataType::Float64)?;
            let values = values.f64()?;

            if let (Some(min), Some(max), Some(mean)) = (values.min(), values.max(), values.mean()) {
                stats.insert(name.to_string(), FeatureStats { min, max, mean });
            }
        }

        Ok(Self(stats))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const HEADER: &str = ",price,freight_value,payment_installments,delivery_diff_than_estimated,reviewed_days,customer_state_enc,product_category_name_enc,payment_type_enc";

    fn write_csv(dir: &Path, rows: &[&str]) -> std::path::PathBuf {
        let path = dir.join("x_test.csv");
        let mut content = String::from(HEADER);
        for row in rows {
            content.push('\n');
            content.push_str(row);
        }
        content.push('\n');
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_stats_over_sample() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), &[
            "0,10.0,5.0,1,-3,0,0.5,40,0",
            "1,30.0,15.0,3,7,2,0.7,41,1",
            "2,20.0,10.0,2,2,1,0.6,42,2",
            // Outside the sample, must not affect stats
            "3,9000.0,400.0,24,150,100,1.0,9000,3",
        ]);

        let ranges = FeatureRanges::load(&path, 3).unwrap();
        assert_eq!(ranges.len(), 8);

        let json = serde_json::to_value(&ranges).unwrap();
        assert_eq!(json["price"]["min"], 10.0);
        assert_eq!(json["price"]["max"], 30.0);
        assert!((json["price"]["mean"].as_f64().unwrap() - 20.0).abs() < 1e-9);
        assert_eq!(json["delivery_diff_than_estimated"]["min"], -3.0);
        assert_eq!(json["delivery_diff_than_estimated"]["max"], 7.0);
    }

    #[test]
    fn test_index_column_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), &["0,1,1,1,1,1,0.1,1,1"]);

        let ranges = FeatureRanges::load(&path, 1000).unwrap();
        assert_eq!(ranges.len(), 8);

        let json = serde_json::to_value(&ranges).unwrap();
        assert!(json.get("").is_none());
        assert_eq!(json["customer_state_enc"]["max"], 0.1);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FeatureRanges::load(&dir.path().join("absent.csv"), 1000).is_none());
    }

    #[test]
    fn test_no_feature_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.csv");
        fs::write(&path, "a,b\n1,2\n").unwrap();
        assert!(FeatureRanges::load(&path, 1000).is_none());
    }
}
