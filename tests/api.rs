//! HTTP surface tests, driven through the router with `oneshot`

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use churn_serving::{
    config::Config,
    create_router,
    features::FeatureVector,
    ml::{Classifier, FeatureRanges, ModelRegistry, ScoringError},
    settings::MODEL_FILES,
    AppState,
};

// ============================================================================
// FIXTURES
// ============================================================================

const XGBOOST: &str = r#"{
    "kind": "xgboost",
    "base_score": 0.5,
    "trees": [
        {"nodes": [{"feature": 3, "threshold": 0.0, "left": 1, "right": 2},
                   {"value": -0.8}, {"value": 1.2}]},
        {"nodes": [{"feature": 4, "threshold": 5.0, "left": 1, "right": 2},
                   {"value": 0.3}, {"value": -0.4}]}
    ],
    "feature_importances": [0.05, 0.02, 0.08, 0.45, 0.25, 0.05, 0.04, 0.06]
}"#;

const LOGISTIC_REGRESSION: &str = r#"{
    "kind": "logistic_regression",
    "coef": [0.001, 0.002, -0.05, 0.04, -0.01, 0.3, 0.0, 0.1],
    "intercept": -0.2
}"#;

const RANDOM_FOREST: &str = r#"{
    "kind": "random_forest",
    "trees": [
        {"nodes": [{"feature": 0, "threshold": 100.0, "left": 1, "right": 2},
                   {"value": 0.2}, {"value": 0.6}]}
    ]
}"#;

/// Counts how often it is scored
struct Counting {
    calls: Arc<AtomicUsize>,
}

impl Classifier for Counting {
    fn type_name(&self) -> &str {
        "Counting"
    }

    fn predict_proba(&self, _x: &FeatureVector) -> Result<f64, ScoringError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(0.42)
    }

    fn importances(&self) -> Option<Vec<f64>> {
        None
    }
}

/// Emits a value no probability can take
struct Broken;

impl Classifier for Broken {
    fn type_name(&self) -> &str {
        "Broken"
    }

    fn predict_proba(&self, _x: &FeatureVector) -> Result<f64, ScoringError> {
        Ok(f64::NAN)
    }

    fn importances(&self) -> Option<Vec<f64>> {
        None
    }
}

fn write_models(dir: &Path) {
    fs::write(dir.join("xgboost_grid.json"), XGBOOST).unwrap();
    fs::write(dir.join("logistic_regression.json"), LOGISTIC_REGRESSION).unwrap();
    fs::write(dir.join("random_forest.json"), RANDOM_FOREST).unwrap();
    // GradientBoosting is deliberately absent
}

fn loaded_registry(dir: &Path) -> ModelRegistry {
    write_models(dir);
    let mut registry = ModelRegistry::new(8);
    let report = registry.load_all(dir, MODEL_FILES);
    assert_eq!(report.loaded, 3);
    assert_eq!(report.failures.len(), 1);
    registry
}

fn app(registry: ModelRegistry, ranges: Option<FeatureRanges>) -> Router {
    create_router(AppState::new(registry, ranges, Config::default()))
}

fn scenario_body() -> Value {
    json!({
        "price": 118.86,
        "freight_value": 20.10,
        "payment_installments": 3,
        "delivery_diff_than_estimated": 11,
        "reviewed_days": 0,
        "customer_state_enc": 0.795,
        "product_category_name_enc": 40,
        "payment_type_enc": 0
    })
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read(response).await
}

async fn post(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read(response).await
}

async fn get_gzip(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .header("accept-encoding", "gzip")
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn read(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

// ============================================================================
// SERVICE STATUS
// ============================================================================

#[tokio::test]
async fn test_root_and_health() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(loaded_registry(dir.path()), None);

    let (status, body) = get(app.clone(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["models"], 3);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    let (status, body) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["models"], 3);
}

#[tokio::test]
async fn test_health_with_no_models() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = ModelRegistry::new(8);
    let report = registry.load_all(dir.path(), MODEL_FILES);
    assert_eq!(report.loaded, 0);

    let (status, body) = get(app(registry, None), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["models"], 0);
}

#[tokio::test]
async fn test_models_listing() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get(app(loaded_registry(dir.path()), None), "/models").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(
        body["available_models"],
        json!(["XGBoost", "RandomForest", "LogisticRegression"])
    );

    let xgb = &body["metadata"]["XGBoost"];
    assert_eq!(xgb["type"], "XGBClassifier");
    assert_eq!(xgb["has_feature_importance"], true);
    assert_eq!(xgb["sha256"].as_str().unwrap().len(), 64);

    assert_eq!(body["metadata"]["RandomForest"]["has_feature_importance"], false);
    assert_eq!(body["metadata"]["LogisticRegression"]["has_feature_importance"], true);
    assert!(body["metadata"]["GradientBoosting"].is_null());
}

// ============================================================================
// PREDICTION
// ============================================================================

#[tokio::test]
async fn test_predict_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = post(
        app(loaded_registry(dir.path()), None),
        "/predict/XGBoost",
        &scenario_body(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_name"], "XGBoost");

    let p = body["churn_probability"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&p));

    let expected: u64 = if p >= 0.5 { 1 } else { 0 };
    assert_eq!(body["prediction"], expected);

    // Late delivery and no review: margin 1.2 + 0.3, sigmoid(1.5) ~ 0.8176
    assert!((p - 0.8176).abs() < 1e-4);
    assert_eq!(body["prediction"], 1);
    assert_eq!(body["confidence"], "Medium Probability that it will Churn");
}

#[tokio::test]
async fn test_predict_accepts_integral_floats() {
    let dir = tempfile::tempdir().unwrap();
    let mut body = scenario_body();
    body["payment_installments"] = json!(3.0);
    body["product_category_name_enc"] = json!(40.0);

    let (status, response) = post(app(loaded_registry(dir.path()), None), "/predict/XGBoost", &body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["churn_probability"], 0.8176);

    let mut fractional = scenario_body();
    fractional["payment_installments"] = json!(3.5);
    let dir = tempfile::tempdir().unwrap();
    let (status, response) = post(app(loaded_registry(dir.path()), None), "/predict/XGBoost", &fractional).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response["error"], "validation_error");
}

#[tokio::test]
async fn test_predict_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(loaded_registry(dir.path()), None);

    let (_, first) = post(app.clone(), "/predict/LogisticRegression", &scenario_body()).await;
    let (_, second) = post(app, "/predict/LogisticRegression", &scenario_body()).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_predict_unknown_model() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = post(
        app(loaded_registry(dir.path()), None),
        "/predict/GradientBoosting",
        &scenario_body(),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["message"], "Model not found");
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn test_predict_rejects_out_of_range_without_scoring() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = ModelRegistry::new(8);
    registry.insert("Counting", Box::new(Counting { calls: calls.clone() }), None);
    let app = app(registry, None);

    let mut body = scenario_body();
    body["price"] = json!(-1.0);
    let (status, response) = post(app.clone(), "/predict/Counting", &body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response["error"], "validation_error");
    assert!(response["message"].as_str().unwrap().contains("price"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    // Boundaries are inclusive
    let mut body = scenario_body();
    body["price"] = json!(10000.0);
    body["delivery_diff_than_estimated"] = json!(-50);
    let (status, response) = post(app, "/predict/Counting", &body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["prediction"], 0);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_predict_rejects_malformed_body() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(loaded_registry(dir.path()), None);

    let mut missing = scenario_body();
    missing.as_object_mut().unwrap().remove("reviewed_days");
    let (status, body) = post(app.clone(), "/predict/XGBoost", &missing).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");

    let mut wrong_type = scenario_body();
    wrong_type["payment_installments"] = json!("two");
    let (status, _) = post(app, "/predict/XGBoost", &wrong_type).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_predict_contains_scoring_failure() {
    let mut registry = ModelRegistry::new(8);
    registry.insert("Broken", Box::new(Broken), None);

    let (status, body) = post(app(registry, None), "/predict/Broken", &scenario_body()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "prediction_failed");
    assert_eq!(body["message"], "Prediction failed");
}

// ============================================================================
// FEATURE IMPORTANCE
// ============================================================================

#[tokio::test]
async fn test_feature_importance_ranking() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(loaded_registry(dir.path()), None);

    let (status, body) = get(app.clone(), "/feature-importance/XGBoost").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_name"], "XGBoost");

    let top = body["top_features"].as_array().unwrap();
    assert_eq!(top.len(), 5);
    assert_eq!(top[0], json!(["delivery_diff_than_estimated", 0.45]));
    assert_eq!(top[1], json!(["reviewed_days", 0.25]));

    let all = body["feature_importance"].as_object().unwrap();
    assert_eq!(all.len(), 8);
    let scores: Vec<f64> = all.values().map(|v| v.as_f64().unwrap()).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));

    // Served from cache the second time, same answer
    let (_, again) = get(app, "/feature-importance/XGBoost").await;
    assert_eq!(body, again);
}

#[tokio::test]
async fn test_feature_importance_linear_model() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get(
        app(loaded_registry(dir.path()), None),
        "/feature-importance/LogisticRegression",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // Coefficient magnitude
    assert_eq!(body["top_features"][0], json!(["customer_state_enc", 0.3]));
}

#[tokio::test]
async fn test_feature_importance_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get(
        app(loaded_registry(dir.path()), None),
        "/feature-importance/RandomForest",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "unsupported");
    assert_eq!(body["message"], "Feature importance not available");
}

#[tokio::test]
async fn test_feature_importance_unknown_model() {
    let dir = tempfile::tempdir().unwrap();
    let (status, _) = get(
        app(loaded_registry(dir.path()), None),
        "/feature-importance/GradientBoosting",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// REFERENCE DATA
// ============================================================================

#[tokio::test]
async fn test_feature_ranges_unavailable() {
    let (status, body) = get(app(ModelRegistry::new(8), None), "/feature-ranges").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "feature_ranges_unavailable");
    assert_eq!(body["message"], "Feature ranges not loaded");
}

#[tokio::test]
async fn test_feature_ranges_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("x_test.csv");
    fs::write(
        &path,
        "price,freight_value,payment_installments,delivery_diff_than_estimated,reviewed_days,customer_state_enc,product_category_name_enc,payment_type_enc\n\
         10.0,5.0,1,-3,0,0.5,40,0\n\
         30.0,15.0,3,7,2,0.7,41,1\n",
    )
    .unwrap();
    let ranges = FeatureRanges::load(&path, 1000);
    assert!(ranges.is_some());

    let (status, body) = get(app(ModelRegistry::new(8), ranges), "/feature-ranges").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"]["min"], 10.0);
    assert_eq!(body["price"]["max"], 30.0);
    assert_eq!(body["price"]["mean"], 20.0);
    assert_eq!(body.as_object().unwrap().len(), 8);
}

#[tokio::test]
async fn test_model_performance() {
    let (status, body) = get(app(ModelRegistry::new(8), None), "/model-performance").await;

    assert_eq!(status, StatusCode::OK);
    for name in ["XGBoost", "GradientBoosting", "RandomForest", "LogisticRegression"] {
        let accuracy = body[name]["test"]["accuracy"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&accuracy));
        assert!(body[name]["train"].is_object());
    }
}

#[tokio::test]
async fn test_unknown_route() {
    let (status, body) = get(app(ModelRegistry::new(8), None), "/no-such-route").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

// ============================================================================
// COMPRESSION
// ============================================================================

#[tokio::test]
async fn test_small_responses_not_compressed() {
    let dir = tempfile::tempdir().unwrap();
    let response = get_gzip(app(loaded_registry(dir.path()), None), "/models").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("content-encoding").is_none());

    let (_, body) = read(response).await;
    assert!(body.to_string().len() < 1000);
    assert_eq!(body["total"], 3);
}

#[tokio::test]
async fn test_large_responses_compressed() {
    let mut registry = ModelRegistry::new(8);
    for i in 0..40 {
        let calls = Arc::new(AtomicUsize::new(0));
        registry.insert(&format!("Counting{:02}", i), Box::new(Counting { calls }), None);
    }

    let response = get_gzip(app(registry, None), "/models").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-encoding"], "gzip");
}
