//! API route handlers

use crate::error::ApiError;
use crate::payload;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: Vec<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health/info endpoint
pub async fn home() -> Html<&'static str> {
    Html("<h3>Housing Price Prediction Service is up</h3>")
}

/// Validate the payload, build the feature table and run the model
pub async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PredictionResponse>, ApiError> {
    let payload = payload::parse_object(&body).map_err(|e| {
        tracing::warn!(error = %e, "Rejected request body");
        e
    })?;

    tracing::info!(
        "JSON payload received:\n{}",
        serde_json::to_string_pretty(&payload).unwrap_or_default()
    );

    payload::check_keys(&payload).map_err(|e| {
        tracing::warn!(error = %e, "Payload keys do not match the feature schema");
        e
    })?;

    let frame = payload::to_frame(&payload).map_err(|e| {
        tracing::error!(error = %e, "Failed to construct numeric table");
        e
    })?;
    tracing::info!("Inference table:\n{}", frame);

    let prediction = state.model().predict(&frame).map_err(|e| {
        tracing::error!(error = %e, "Model prediction failed");
        ApiError::Internal("Model prediction failed.".to_string())
    })?;
    tracing::info!(?prediction, "Model prediction");

    Ok(Json(PredictionResponse { prediction }))
}
