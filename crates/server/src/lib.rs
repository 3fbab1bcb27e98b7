//! # housing-server
//!
//! REST API serving predictions from a fitted housing price pipeline.
//!
//! The model is loaded once at startup and injected into the router through
//! [`AppState`]; handlers only ever read it.

use axum::{
    routing::{get, post},
    Router,
};
use pipeline_core::artifact::{self, ArtifactError};
use pipeline_core::{Pipeline, Predictor};
use std::path::Path;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod payload;
pub mod routes;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    model: Arc<dyn Predictor>,
}

impl AppState {
    pub fn new(model: Arc<dyn Predictor>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &dyn Predictor {
        self.model.as_ref()
    }
}

/// Build the router with all routes and middleware
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::home))
        .route("/predict", post(routes::predict))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Load the fitted pipeline from `path` and check it can serve predictions
pub fn load_model(path: &Path) -> Result<Pipeline, ArtifactError> {
    let model: Pipeline = artifact::load(path)?;
    model.validate().map_err(|source| ArtifactError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        path = %path.display(),
        features = ?model.feature_names(),
        "Model loaded successfully"
    );
    Ok(model)
}

/// Turn a model loading failure into the fatal startup error
pub fn startup_error(err: ArtifactError) -> anyhow::Error {
    match err {
        ArtifactError::NotFound(path) => anyhow::anyhow!(
            "Model file not found at {}. Run train-and-export to generate it first.",
            path.display()
        ),
        other => anyhow::Error::new(other).context("Failed to load model"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline_core::ModelError;
    use std::path::PathBuf;

    #[test]
    fn test_startup_error_for_missing_model() {
        let path = PathBuf::from("./model_data/boston_housing_prediction.joblib");
        let message = startup_error(ArtifactError::NotFound(path)).to_string();

        assert!(message.contains("./model_data/boston_housing_prediction.joblib"));
        assert!(message.contains("Run train-and-export"));
    }

    #[test]
    fn test_startup_error_keeps_cause() {
        let err = startup_error(ArtifactError::Invalid {
            path: PathBuf::from("model.joblib"),
            source: ModelError::NotFitted,
        });

        assert_eq!(err.to_string(), "Failed to load model");
        let chain = format!("{:#}", err);
        assert!(chain.contains("not usable"), "{}", chain);
        assert!(!chain.contains("train-and-export"));
    }
}
