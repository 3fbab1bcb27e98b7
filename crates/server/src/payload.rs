//! Request payload validation
//!
//! A prediction request is a JSON object keyed by feature name, each value
//! mapping row indices to numbers:
//!
//! ```json
//! { "CHAS": {"0": 0}, "RM": {"0": 6.575}, "TAX": {"0": 296.0},
//!   "PTRATIO": {"0": 15.3}, "B": {"0": 396.9}, "LSTAT": {"0": 4.98} }
//! ```
//!
//! Rows are emitted in the order their indices appear under `CHAS`.

use housing::{feature_names, is_feature, FEATURES};
use pipeline_core::FeatureFrame;
use serde_json::{Map, Value};
use thiserror::Error;

pub type JsonObject = Map<String, Value>;

#[derive(Debug, Error, PartialEq)]
pub enum PayloadError {
    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),

    #[error("JSON payload must be an object/dict.")]
    NotAnObject,

    #[error("Missing required keys: {0:?}")]
    MissingKeys(Vec<String>),

    #[error("Unexpected keys present: {0:?}")]
    UnexpectedKeys(Vec<String>),

    #[error("Could not build numeric table: {0}")]
    Table(String),
}

/// Parse the raw body and require a top-level object
pub fn parse_object(body: &[u8]) -> Result<JsonObject, PayloadError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| PayloadError::InvalidJson(e.to_string()))?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(PayloadError::NotAnObject),
    }
}

/// Require the key set to equal the feature schema
///
/// Missing keys are reported before unexpected ones.
pub fn check_keys(payload: &JsonObject) -> Result<(), PayloadError> {
    let missing: Vec<String> = FEATURES
        .iter()
        .filter(|name| !payload.contains_key(**name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PayloadError::MissingKeys(missing));
    }

    let extra: Vec<String> = payload.keys().filter(|k| !is_feature(k)).cloned().collect();
    if !extra.is_empty() {
        return Err(PayloadError::UnexpectedKeys(extra));
    }

    Ok(())
}

/// Convert a schema-checked payload into a [`FeatureFrame`]
///
/// Every feature must carry exactly the row indices of the first feature,
/// and every cell must be a finite number, a boolean or a numeric string.
pub fn to_frame(payload: &JsonObject) -> Result<FeatureFrame, PayloadError> {
    let columns = FEATURES
        .iter()
        .map(|name| column(payload, name))
        .collect::<Result<Vec<_>, _>>()?;

    let index: Vec<&String> = columns[0].keys().collect();
    if index.is_empty() {
        return Err(PayloadError::Table("payload contains no rows".to_string()));
    }

    for (name, col) in FEATURES.iter().zip(&columns).skip(1) {
        if col.len() != index.len() || !index.iter().all(|row| col.contains_key(row.as_str())) {
            return Err(PayloadError::Table(format!(
                "column '{}' has row indices {:?}, expected {:?}",
                name,
                col.keys().collect::<Vec<_>>(),
                index
            )));
        }
    }

    let mut values = Vec::with_capacity(index.len() * FEATURES.len());
    for row in &index {
        for (name, col) in FEATURES.iter().zip(&columns) {
            values.push(cell(name, row, &col[row.as_str()])?);
        }
    }

    FeatureFrame::new(feature_names(), values).map_err(|e| PayloadError::Table(e.to_string()))
}

fn column<'a>(payload: &'a JsonObject, name: &str) -> Result<&'a JsonObject, PayloadError> {
    payload
        .get(name)
        .and_then(Value::as_object)
        .ok_or_else(|| {
            PayloadError::Table(format!("column '{}' must map row indices to values", name))
        })
}

fn cell(name: &str, row: &str, value: &Value) -> Result<f64, PayloadError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(PayloadError::Table(format!(
            "value {} at {}[{}] is not a finite number",
            value, name, row
        ))),
    }
}
