//! Standard scaling step
//!
//! Learns per-column mean and population standard deviation and maps every
//! value to `(x - mean) / std`.

use pipeline_spi::{FeatureFrame, ModelError, Result, Transformer};
use serde::{Deserialize, Serialize};

/// Standardize features to zero mean and unit variance
///
/// Columns with zero variance keep a scale of `1.0`, so they are only
/// centered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    with_mean: bool,
    with_std: bool,
    mean: Vec<f64>,
    scale: Vec<f64>,
    fitted: bool,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::with_options(true, true)
    }

    /// Create a scaler that optionally skips centering or scaling
    pub fn with_options(with_mean: bool, with_std: bool) -> Self {
        Self {
            with_mean,
            with_std,
            mean: Vec::new(),
            scale: Vec::new(),
            fitted: false,
        }
    }

    /// Per-column means learned during fit
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Per-column divisors learned during fit
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Undo the transformation
    pub fn inverse_transform(&self, frame: &FeatureFrame) -> Result<FeatureFrame> {
        self.check_input(frame)?;
        Ok(frame.map_values(|j, v| v * self.scale[j] + self.mean[j]))
    }

    /// Check that the learned statistics cover exactly `n_features` columns
    pub fn validate(&self, n_features: usize) -> Result<()> {
        if !self.fitted {
            return Err(ModelError::NotFitted);
        }
        for (name, learned) in [("mean", &self.mean), ("scale", &self.scale)] {
            if learned.len() != n_features {
                return Err(ModelError::ShapeMismatch {
                    expected: format!("{} {} values", n_features, name),
                    actual: format!("{} {} values", learned.len(), name),
                });
            }
        }
        if self.scale.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
            return Err(ModelError::InvalidData(
                "scale values must be positive and finite".to_string(),
            ));
        }
        Ok(())
    }

    fn check_input(&self, frame: &FeatureFrame) -> Result<()> {
        self.validate(frame.n_features())
    }
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer for StandardScaler {
    fn fit(&mut self, frame: &FeatureFrame) -> Result<()> {
        if frame.is_empty() {
            return Err(ModelError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }
        if frame.values().iter().any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidData(
                "input contains NaN or infinite values".to_string(),
            ));
        }

        let n = frame.n_rows() as f64;
        let mut mean = Vec::with_capacity(frame.n_features());
        let mut scale = Vec::with_capacity(frame.n_features());

        for j in 0..frame.n_features() {
            let col_mean = frame.column(j).sum::<f64>() / n;
            let variance = frame.column(j).map(|v| (v - col_mean).powi(2)).sum::<f64>() / n;
            let std_dev = variance.sqrt();

            mean.push(if self.with_mean { col_mean } else { 0.0 });
            scale.push(if self.with_std && std_dev > f64::EPSILON {
                std_dev
            } else {
                1.0
            });
        }

        self.mean = mean;
        self.scale = scale;
        self.fitted = true;
        Ok(())
    }

    fn transform(&self, frame: &FeatureFrame) -> Result<FeatureFrame> {
        self.check_input(frame)?;
        Ok(frame.map_values(|j, v| (v - self.mean[j]) / self.scale[j]))
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}
