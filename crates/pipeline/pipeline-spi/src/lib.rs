//! Pipeline Service Provider Interface
//!
//! Defines the contracts shared by every regression pipeline component:
//!
//! - [`FeatureFrame`]: Row-major numeric table with named columns
//! - [`Predictor`]: Inference-only contract, the seam the HTTP layer depends on
//! - [`Estimator`]: A [`Predictor`] that can be fitted on a frame and a target
//! - [`Transformer`]: Fitted column-wise feature transformation
//! - [`ModelError`]: Standardized error type for all model operations

pub mod contract;
pub mod error;
pub mod frame;

pub use contract::{Estimator, Predictor, Transformer};
pub use error::{ModelError, Result};
pub use frame::FeatureFrame;
