//! Scaling + regression pipeline
//!
//! [`Pipeline`] chains a [`StandardScaler`] and a
//! [`GradientBoostingRegressor`] and applies them as one unit. It remembers
//! the ordered column names it was fitted on and refuses frames with
//! different columns.

use crate::boosting::GradientBoostingRegressor;
use crate::scaler::StandardScaler;
use pipeline_spi::{Estimator, FeatureFrame, ModelError, Predictor, Result, Transformer};
use serde::{Deserialize, Serialize};

/// Fitted scaler followed by a boosted regressor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pipeline {
    feature_names: Vec<String>,
    scaler: StandardScaler,
    regressor: GradientBoostingRegressor,
}

impl Pipeline {
    pub fn new(scaler: StandardScaler, regressor: GradientBoostingRegressor) -> Self {
        Self {
            feature_names: Vec::new(),
            scaler,
            regressor,
        }
    }

    /// Column names seen during fit, in order
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn regressor(&self) -> &GradientBoostingRegressor {
        &self.regressor
    }

    /// Feature importances paired with their column names
    pub fn feature_importances(&self) -> Vec<(String, f64)> {
        self.feature_names
            .iter()
            .cloned()
            .zip(self.regressor.feature_importances())
            .collect()
    }

    /// Check that a fitted (or reloaded) pipeline is internally consistent
    ///
    /// Scaler, regressor and column names must agree on the feature count
    /// and every tree must be walkable.
    pub fn validate(&self) -> Result<()> {
        let n_features = self.feature_names.len();
        if n_features == 0 {
            return Err(ModelError::NotFitted);
        }
        self.scaler.validate(n_features)?;
        self.regressor.validate()?;
        if self.regressor.n_features() != n_features {
            return Err(ModelError::ShapeMismatch {
                expected: format!("{} features", n_features),
                actual: format!("{} features", self.regressor.n_features()),
            });
        }
        Ok(())
    }
}

impl Predictor for Pipeline {
    fn predict(&self, frame: &FeatureFrame) -> Result<Vec<f64>> {
        if !self.is_fitted() {
            return Err(ModelError::NotFitted);
        }
        if frame.columns() != self.feature_names.as_slice() {
            return Err(ModelError::FeatureMismatch {
                expected: self.feature_names.clone(),
                actual: frame.columns().to_vec(),
            });
        }
        if frame.is_empty() {
            return Err(ModelError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }

        let scaled = self.scaler.transform(frame)?;
        self.regressor.predict(&scaled)
    }
}

impl Estimator for Pipeline {
    fn fit(&mut self, frame: &FeatureFrame, target: &[f64]) -> Result<()> {
        let scaled = self.scaler.fit_transform(frame)?;
        self.regressor.fit(&scaled, target)?;
        self.feature_names = frame.columns().to_vec();
        Ok(())
    }

    fn is_fitted(&self) -> bool {
        self.scaler.is_fitted() && self.regressor.is_fitted()
    }
}
