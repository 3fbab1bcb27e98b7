//! Pipeline Core
//!
//! Concrete regression components built on the `pipeline-spi` contracts:
//!
//! - [`StandardScaler`]: Zero mean, unit variance feature scaling
//! - [`RegressionTree`]: CART regression tree with exact greedy splits
//! - [`GradientBoostingRegressor`]: Squared-loss gradient boosting over trees
//! - [`Pipeline`]: Scaler followed by the boosted regressor, applied as one unit
//! - [`metrics`]: Regression quality metrics
//! - [`artifact`]: JSON persistence of fitted models
//!
//! ## Example
//!
//! ```rust
//! use pipeline_core::prelude::*;
//!
//! let x: Vec<f64> = (0..50).map(|i| i as f64).collect();
//! let y: Vec<f64> = x.iter().map(|v| 3.0 * v + 1.0).collect();
//! let frame = FeatureFrame::from_columns(vec![("x".to_string(), x)]).unwrap();
//!
//! let mut pipeline = Pipeline::default();
//! pipeline.fit(&frame, &y).unwrap();
//! let predictions = pipeline.predict(&frame).unwrap();
//! assert!(r2_score(&y, &predictions) > 0.9);
//! ```

pub mod artifact;
pub mod boosting;
pub mod metrics;
mod pipeline;
pub mod scaler;
pub mod tree;

pub use artifact::ArtifactError;
pub use boosting::{GradientBoostingParams, GradientBoostingRegressor};
pub use pipeline::Pipeline;
pub use scaler::StandardScaler;
pub use tree::{RegressionTree, TreeParams};

// Re-export contracts from SPI
pub use pipeline_spi::{Estimator, FeatureFrame, ModelError, Predictor, Result, Transformer};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::metrics::{mean_absolute_error, mean_squared_error, r2_score};
    pub use crate::{
        Estimator, FeatureFrame, ModelError, Predictor, Result, Transformer,
    };
    pub use crate::{GradientBoostingParams, GradientBoostingRegressor, Pipeline, StandardScaler};
}
