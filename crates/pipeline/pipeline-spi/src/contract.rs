//! Contract traits for pipeline components
//!
//! Models follow a fit/predict pattern. Inference is split from training so
//! that serving code can depend on [`Predictor`] alone and accept any
//! read-only model, including test doubles.

use crate::error::Result;
use crate::frame::FeatureFrame;

/// Inference-only contract
///
/// Implementations must be immutable once fitted; `predict` takes `&self`
/// and may be called concurrently from several threads.
///
/// # Example
///
/// ```rust,ignore
/// use pipeline_spi::{FeatureFrame, Predictor};
///
/// fn score(model: &dyn Predictor, frame: &FeatureFrame) -> pipeline_spi::Result<f64> {
///     let predictions = model.predict(frame)?;
///     Ok(predictions.iter().sum::<f64>() / predictions.len() as f64)
/// }
/// ```
pub trait Predictor: Send + Sync {
    /// Predict one value per row of `frame`, in row order
    fn predict(&self, frame: &FeatureFrame) -> Result<Vec<f64>>;
}

/// A [`Predictor`] that can be fitted on a frame and a target vector
pub trait Estimator: Predictor {
    /// Fit the model to `frame` and `target`
    ///
    /// `target.len()` must equal `frame.n_rows()`.
    fn fit(&mut self, frame: &FeatureFrame, target: &[f64]) -> Result<()>;

    /// Check if the model has been fitted
    fn is_fitted(&self) -> bool;
}

/// Column-wise feature transformation learned from data
pub trait Transformer: Send + Sync {
    /// Learn transformation parameters from `frame`
    fn fit(&mut self, frame: &FeatureFrame) -> Result<()>;

    /// Apply the learned transformation
    fn transform(&self, frame: &FeatureFrame) -> Result<FeatureFrame>;

    /// Fit then transform the same frame
    fn fit_transform(&mut self, frame: &FeatureFrame) -> Result<FeatureFrame> {
        self.fit(frame)?;
        self.transform(frame)
    }

    /// Check if the transformer has been fitted
    fn is_fitted(&self) -> bool;
}
