//! Integration tests for the HTTP API
//!
//! Requests are driven through the router with `tower::ServiceExt::oneshot`;
//! no socket is bound.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use housing::{generate, SyntheticConfig};
use housing_server::{app, load_model, AppState};
use http_body_util::BodyExt;
use pipeline_core::artifact;
use pipeline_core::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::tempdir;
use tower::ServiceExt;

/// Returns the sum of each row
struct RowSum;

impl Predictor for RowSum {
    fn predict(&self, frame: &FeatureFrame) -> pipeline_core::Result<Vec<f64>> {
        Ok(frame.rows().map(|row| row.iter().sum()).collect())
    }
}

/// Always fails
struct Broken;

impl Predictor for Broken {
    fn predict(&self, _frame: &FeatureFrame) -> pipeline_core::Result<Vec<f64>> {
        Err(ModelError::NotFitted)
    }
}

fn router_with(model: impl Predictor + 'static) -> Router {
    app(AppState::new(Arc::new(model)))
}

fn example_payload() -> Value {
    json!({
        "CHAS": {"0": 0},
        "RM": {"0": 6.575},
        "TAX": {"0": 296.0},
        "PTRATIO": {"0": 15.3},
        "B": {"0": 396.9},
        "LSTAT": {"0": 4.98}
    })
}

fn small_pipeline() -> Pipeline {
    let data = generate(&SyntheticConfig {
        n_samples: 300,
        seed: 42,
    })
    .unwrap();
    let regressor = GradientBoostingRegressor::new(GradientBoostingParams {
        n_estimators: 20,
        ..GradientBoostingParams::default()
    })
    .unwrap();

    let mut pipeline = Pipeline::new(StandardScaler::new(), regressor);
    pipeline.fit(&data.features, &data.target).unwrap();
    pipeline
}

async fn post_predict(router: Router, body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn error_message(body: &Value) -> &str {
    body["error"].as_str().unwrap()
}

#[tokio::test]
async fn test_home_returns_html() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = router_with(RowSum).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(!bytes.is_empty());
    assert!(std::str::from_utf8(&bytes).unwrap().contains("is up"));
}

#[tokio::test]
async fn test_predict_single_row() {
    let (status, body) = post_predict(router_with(RowSum), example_payload().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let prediction = body["prediction"].as_array().unwrap();
    assert_eq!(prediction.len(), 1);

    let expected = 0.0 + 6.575 + 296.0 + 15.3 + 396.9 + 4.98;
    assert!((prediction[0].as_f64().unwrap() - expected).abs() < 1e-9);
}

#[tokio::test]
async fn test_predict_multiple_rows_keeps_order() {
    let payload = r#"{
        "CHAS": {"1": 1, "0": 0},
        "RM": {"0": 1, "1": 2},
        "TAX": {"0": 0, "1": 0},
        "PTRATIO": {"0": 0, "1": 0},
        "B": {"0": 0, "1": 0},
        "LSTAT": {"0": 0, "1": 0}
    }"#;
    let (status, body) = post_predict(router_with(RowSum), payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"prediction": [3.0, 1.0]}));
}

#[tokio::test]
async fn test_missing_key_is_named() {
    for name in housing::FEATURES {
        let mut payload = example_payload();
        payload.as_object_mut().unwrap().remove(name);

        let (status, body) = post_predict(router_with(RowSum), payload.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(
            error_message(&body).contains(name),
            "error should name {}: {}",
            name,
            body
        );
    }
}

#[tokio::test]
async fn test_extra_key_is_named() {
    let mut payload = example_payload();
    payload["ZN"] = json!({"0": 18.0});

    let (status, body) = post_predict(router_with(RowSum), payload.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), r#"Unexpected keys present: ["ZN"]"#);
}

#[tokio::test]
async fn test_non_numeric_value() {
    let mut payload = example_payload();
    payload["RM"] = json!({"0": "six"});

    let (status, body) = post_predict(router_with(RowSum), payload.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(&body),
        "Could not parse payload into numeric DataFrame."
    );
}

#[tokio::test]
async fn test_mismatched_row_indices() {
    let mut payload = example_payload();
    payload["LSTAT"] = json!({"7": 4.98});

    let (status, _) = post_predict(router_with(RowSum), payload.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_truncated_json() {
    let truncated = r#"{"CHAS": {"0": 0}, "RM": {"0": 6.5"#;
    let (status, body) = post_predict(router_with(RowSum), truncated).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Invalid JSON body.");
}

#[tokio::test]
async fn test_non_object_json() {
    let (status, body) = post_predict(router_with(RowSum), "[1, 2, 3]").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "JSON payload must be an object/dict.");
}

#[tokio::test]
async fn test_model_failure_is_server_error() {
    let (status, body) = post_predict(router_with(Broken), example_payload().to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_message(&body), "Model prediction failed.");
}

#[tokio::test]
async fn test_home_works_with_any_model() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = router_with(Broken).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_fitted_pipeline_example_payload() {
    let (status, body) =
        post_predict(router_with(small_pipeline()), example_payload().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let prediction = body["prediction"].as_array().unwrap();
    assert_eq!(prediction.len(), 1);
    assert!(prediction[0].as_f64().unwrap().is_finite());
}

#[tokio::test]
async fn test_load_model_from_artifact() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model_data").join("boston_housing_prediction.joblib");
    let pipeline = small_pipeline();
    artifact::save(&pipeline, &path).unwrap();

    let loaded = load_model(&path).unwrap();
    assert_eq!(loaded.feature_names(), pipeline.feature_names());

    let (status, body) = post_predict(router_with(loaded), example_payload().to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"].as_array().unwrap().len(), 1);
}

#[test]
fn test_load_model_rejects_inconsistent_artifact() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("boston_housing_prediction.joblib");
    artifact::save(&small_pipeline(), &path).unwrap();

    let mut raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    *raw.pointer_mut("/model/regressor/trees/0/nodes/0/feature")
        .unwrap() = json!(7);
    std::fs::write(&path, raw.to_string()).unwrap();

    let result = load_model(&path);
    assert!(matches!(
        result,
        Err(pipeline_core::ArtifactError::Invalid { .. })
    ));
}

#[test]
fn test_load_model_missing_file() {
    let dir = tempdir().unwrap();
    let result = load_model(&dir.path().join("absent.joblib"));
    assert!(matches!(result, Err(pipeline_core::ArtifactError::NotFound(_))));
}
