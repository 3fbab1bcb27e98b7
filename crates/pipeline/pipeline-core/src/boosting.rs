//! Gradient boosted regression trees
//!
//! Squared-error gradient boosting: the ensemble starts from the target mean
//! and each stage fits a [`RegressionTree`] to the current residuals (the
//! negative gradient of the loss), then adds the tree's output scaled by the
//! learning rate.
//!
//! ## Parameters
//!
//! - `n_estimators`: Number of boosting stages
//! - `learning_rate`: Shrinkage applied to every tree
//! - `max_depth`, `min_samples_split`, `min_samples_leaf`: Tree stopping rules
//! - `subsample`: Fraction of rows drawn (without replacement) per stage
//! - `seed`: Seed for row subsampling

use crate::tree::{RegressionTree, TreeParams};
use pipeline_spi::{Estimator, FeatureFrame, ModelError, Predictor, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Hyper-parameters for [`GradientBoostingRegressor`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostingParams {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub subsample: f64,
    pub seed: u64,
}

impl Default for GradientBoostingParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_split: 2,
            min_samples_leaf: 1,
            subsample: 1.0,
            seed: 42,
        }
    }
}

impl GradientBoostingParams {
    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_estimators < 1 {
            return Err(ModelError::InvalidParameter {
                name: "n_estimators".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ModelError::InvalidParameter {
                name: "learning_rate".to_string(),
                reason: "must be a positive finite number".to_string(),
            });
        }
        if !(self.subsample > 0.0 && self.subsample <= 1.0) {
            return Err(ModelError::InvalidParameter {
                name: "subsample".to_string(),
                reason: "must be in (0, 1]".to_string(),
            });
        }
        self.tree_params().validate()
    }
}

/// Gradient boosting regressor with squared-error loss
///
/// # Example
///
/// ```rust
/// use pipeline_core::{Estimator, FeatureFrame, GradientBoostingRegressor, Predictor};
///
/// let x: Vec<f64> = (0..40).map(|i| i as f64).collect();
/// let y: Vec<f64> = x.iter().map(|v| 2.0 * v).collect();
/// let frame = FeatureFrame::from_columns(vec![("x".to_string(), x)]).unwrap();
///
/// let mut model = GradientBoostingRegressor::default();
/// model.fit(&frame, &y).unwrap();
/// assert_eq!(model.predict(&frame).unwrap().len(), 40);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingRegressor {
    params: GradientBoostingParams,
    /// Initial prediction (target mean)
    init: f64,
    trees: Vec<RegressionTree>,
    /// Training mean squared error after each stage
    train_score: Vec<f64>,
    n_features: usize,
    fitted: bool,
}

impl GradientBoostingRegressor {
    /// Create a new regressor with validated parameters
    pub fn new(params: GradientBoostingParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            init: 0.0,
            trees: Vec::new(),
            train_score: Vec::new(),
            n_features: 0,
            fitted: false,
        })
    }

    pub fn params(&self) -> &GradientBoostingParams {
        &self.params
    }

    /// Fitted trees, one per stage
    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    /// Training MSE recorded after each stage
    pub fn train_score(&self) -> &[f64] {
        &self.train_score
    }

    /// Number of features seen during fit
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Check that a fitted (or reloaded) model can serve predictions
    pub fn validate(&self) -> Result<()> {
        if !self.fitted {
            return Err(ModelError::NotFitted);
        }
        self.params.validate()?;
        if self.n_features == 0 {
            return Err(ModelError::InvalidData(
                "model was fitted on zero features".to_string(),
            ));
        }
        for tree in &self.trees {
            tree.validate(self.n_features)?;
        }
        Ok(())
    }

    /// Relative importance of each feature, summing to 1
    ///
    /// Each tree's squared-error reductions are normalised, averaged over
    /// all trees and normalised again. Returns an empty vector before fit.
    pub fn feature_importances(&self) -> Vec<f64> {
        if !self.fitted {
            return Vec::new();
        }

        let mut totals = vec![0.0; self.n_features];
        for tree in &self.trees {
            let tree_total: f64 = tree.improvements().iter().sum();
            if tree_total > 0.0 {
                for (acc, imp) in totals.iter_mut().zip(tree.improvements()) {
                    *acc += imp / tree_total;
                }
            }
        }

        let grand_total: f64 = totals.iter().sum();
        if grand_total > 0.0 {
            totals.iter_mut().for_each(|v| *v /= grand_total);
        }
        totals
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        let lr = self.params.learning_rate;
        self.init + self.trees.iter().map(|t| lr * t.predict_row(row)).sum::<f64>()
    }

    fn draw_sample(&self, rng: &mut StdRng, n_rows: usize) -> Vec<usize> {
        if self.params.subsample >= 1.0 {
            return (0..n_rows).collect();
        }

        let size = ((self.params.subsample * n_rows as f64) as usize).max(1);
        let mut sample = rand::seq::index::sample(rng, n_rows, size).into_vec();
        sample.sort_unstable();
        sample
    }
}

impl Default for GradientBoostingRegressor {
    fn default() -> Self {
        Self {
            params: GradientBoostingParams::default(),
            init: 0.0,
            trees: Vec::new(),
            train_score: Vec::new(),
            n_features: 0,
            fitted: false,
        }
    }
}

impl Predictor for GradientBoostingRegressor {
    fn predict(&self, frame: &FeatureFrame) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(ModelError::NotFitted);
        }
        if frame.n_features() != self.n_features {
            return Err(ModelError::ShapeMismatch {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", frame.n_features()),
            });
        }

        Ok(frame.rows().map(|row| self.predict_row(row)).collect())
    }
}

impl Estimator for GradientBoostingRegressor {
    fn fit(&mut self, frame: &FeatureFrame, target: &[f64]) -> Result<()> {
        if target.len() != frame.n_rows() {
            return Err(ModelError::ShapeMismatch {
                expected: format!("{} target values", frame.n_rows()),
                actual: format!("{} target values", target.len()),
            });
        }
        if frame.n_rows() < 2 {
            return Err(ModelError::InsufficientData {
                required: 2,
                actual: frame.n_rows(),
            });
        }
        if target.iter().chain(frame.values()).any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidData(
                "input contains NaN or infinite values".to_string(),
            ));
        }

        let n = frame.n_rows();
        let tree_params = self.params.tree_params();
        let mut rng = StdRng::seed_from_u64(self.params.seed);

        self.init = target.iter().sum::<f64>() / n as f64;
        self.trees = Vec::with_capacity(self.params.n_estimators);
        self.train_score = Vec::with_capacity(self.params.n_estimators);
        self.n_features = frame.n_features();

        let mut current = vec![self.init; n];
        let mut residuals = vec![0.0; n];

        for stage in 0..self.params.n_estimators {
            for ((r, &y), &p) in residuals.iter_mut().zip(target).zip(&current) {
                *r = y - p;
            }

            let sample = self.draw_sample(&mut rng, n);
            let mut tree = RegressionTree::new(tree_params)?;
            tree.fit(frame, &residuals, &sample)?;

            for (p, row) in current.iter_mut().zip(frame.rows()) {
                *p += self.params.learning_rate * tree.predict_row(row);
            }
            self.trees.push(tree);

            let mse = target
                .iter()
                .zip(&current)
                .map(|(y, p)| (y - p).powi(2))
                .sum::<f64>()
                / n as f64;
            self.train_score.push(mse);

            if stage % 25 == 0 {
                tracing::debug!(stage, mse, "boosting stage fitted");
            }
        }

        self.fitted = true;
        Ok(())
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}
