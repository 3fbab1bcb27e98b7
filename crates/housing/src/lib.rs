//! # housing
//!
//! Domain definitions shared by the training tool and the prediction
//! service:
//!
//! - [`schema`]: The fixed, ordered feature set and the artifact location
//! - [`synthetic`]: Seeded generator for the synthetic training dataset

pub mod schema;
pub mod synthetic;

pub use schema::{feature_names, is_feature, DEFAULT_MODEL_PATH, FEATURES};
pub use synthetic::{generate, Dataset, SyntheticConfig};
