//! Synthetic housing dataset
//!
//! Generates plausible feature values and a price target with known
//! relationships: more rooms, river frontage (`CHAS`) and a higher `B`
//! raise the price; higher `TAX`, `PTRATIO` and `LSTAT` lower it.
//!
//! Columns are drawn one after another in schema order from a single seeded
//! [`StdRng`], followed by the target noise, so a given seed always yields
//! the same dataset.

use pipeline_spi::{FeatureFrame, ModelError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution as _, Normal};

/// How a feature column is sampled
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distribution {
    /// 0.0 or 1.0 with equal probability
    Binary,
    /// Normal draw clipped to `[min, max]`
    ClippedNormal {
        mean: f64,
        std_dev: f64,
        min: f64,
        max: f64,
    },
}

/// Sampling rule for one column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSampler {
    pub name: &'static str,
    pub distribution: Distribution,
}

const fn clipped(name: &'static str, mean: f64, std_dev: f64, min: f64, max: f64) -> ColumnSampler {
    ColumnSampler {
        name,
        distribution: Distribution::ClippedNormal {
            mean,
            std_dev,
            min,
            max,
        },
    }
}

/// Per-feature distributions, in schema order
pub const COLUMN_SAMPLERS: [ColumnSampler; 6] = [
    ColumnSampler {
        name: "CHAS",
        distribution: Distribution::Binary,
    },
    clipped("RM", 6.2, 0.8, 3.0, 9.0),
    clipped("TAX", 350.0, 120.0, 100.0, 750.0),
    clipped("PTRATIO", 18.0, 2.5, 12.0, 25.0),
    clipped("B", 380.0, 40.0, 200.0, 400.0),
    clipped("LSTAT", 12.0, 7.0, 1.0, 40.0),
];

/// Standard deviation of the Gaussian noise added to the target
pub const TARGET_NOISE_STD: f64 = 10_000.0;

/// Noise-free price for a row in schema order
pub fn expected_price(row: &[f64]) -> f64 {
    let [chas, rm, tax, ptratio, b, lstat] = [row[0], row[1], row[2], row[3], row[4], row[5]];

    10_000.0 * chas + 20_000.0 * (rm - 5.0) - 30.0 * tax - 1_000.0 * (ptratio - 15.0)
        + 50.0 * (b - 350.0)
        - 2_000.0 * (lstat - 10.0)
}

/// Generator settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticConfig {
    pub n_samples: usize,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            n_samples: 5000,
            seed: 42,
        }
    }
}

/// Features and target produced by [`generate`]
#[derive(Debug, Clone)]
pub struct Dataset {
    pub features: FeatureFrame,
    pub target: Vec<f64>,
}

/// Generate a synthetic dataset
pub fn generate(config: &SyntheticConfig) -> Result<Dataset> {
    if config.n_samples == 0 {
        return Err(ModelError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let n = config.n_samples;

    let mut columns = Vec::with_capacity(COLUMN_SAMPLERS.len());
    for sampler in &COLUMN_SAMPLERS {
        let values = sample_column(&mut rng, sampler, n)?;
        columns.push((sampler.name.to_string(), values));
    }
    let features = FeatureFrame::from_columns(columns)?;

    let noise = normal(0.0, TARGET_NOISE_STD)?;
    let target = features
        .rows()
        .map(|row| expected_price(row) + noise.sample(&mut rng))
        .collect();

    Ok(Dataset { features, target })
}

fn sample_column(rng: &mut StdRng, sampler: &ColumnSampler, n: usize) -> Result<Vec<f64>> {
    match sampler.distribution {
        Distribution::Binary => Ok((0..n).map(|_| rng.gen_range(0..2) as f64).collect()),
        Distribution::ClippedNormal {
            mean,
            std_dev,
            min,
            max,
        } => {
            let dist = normal(mean, std_dev)?;
            Ok((0..n).map(|_| dist.sample(rng).clamp(min, max)).collect())
        }
    }
}

fn normal(mean: f64, std_dev: f64) -> Result<Normal<f64>> {
    Normal::new(mean, std_dev).map_err(|e| ModelError::InvalidParameter {
        name: "std_dev".to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> SyntheticConfig {
        SyntheticConfig {
            n_samples: 500,
            seed: 7,
        }
    }

    #[test]
    fn test_shape_and_column_order() {
        let data = generate(&small()).unwrap();
        assert_eq!(data.features.n_rows(), 500);
        assert_eq!(data.target.len(), 500);
        assert_eq!(data.features.columns(), crate::schema::feature_names().as_slice());
    }

    #[test]
    fn test_samplers_follow_schema() {
        let names: Vec<&str> = COLUMN_SAMPLERS.iter().map(|sampler| sampler.name).collect();
        assert_eq!(names, crate::schema::FEATURES);
    }

    #[test]
    fn test_same_seed_same_data() {
        let a = generate(&small()).unwrap();
        let b = generate(&small()).unwrap();
        assert_eq!(a.features, b.features);
        assert_eq!(a.target, b.target);
    }

    #[test]
    fn test_different_seed_different_data() {
        let a = generate(&small()).unwrap();
        let b = generate(&SyntheticConfig {
            seed: 8,
            ..small()
        })
        .unwrap();
        assert_ne!(a.target, b.target);
    }

    #[test]
    fn test_values_respect_clipping() {
        let data = generate(&SyntheticConfig::default()).unwrap();

        for (j, sampler) in COLUMN_SAMPLERS.iter().enumerate() {
            match sampler.distribution {
                Distribution::Binary => {
                    assert!(data.features.column(j).all(|v| v == 0.0 || v == 1.0));
                }
                Distribution::ClippedNormal { min, max, .. } => {
                    assert!(
                        data.features.column(j).all(|v| v >= min && v <= max),
                        "{} out of range",
                        sampler.name
                    );
                }
            }
        }
    }

    #[test]
    fn test_binary_column_is_balanced() {
        let data = generate(&SyntheticConfig::default()).unwrap();
        let ones = data.features.column(0).filter(|&v| v == 1.0).count();
        assert!(ones > 2000 && ones < 3000);
    }

    #[test]
    fn test_target_tracks_expected_price() {
        let data = generate(&SyntheticConfig::default()).unwrap();
        let residuals: Vec<f64> = data
            .features
            .rows()
            .zip(&data.target)
            .map(|(row, y)| y - expected_price(row))
            .collect();

        let n = residuals.len() as f64;
        let mean = residuals.iter().sum::<f64>() / n;
        let std = (residuals.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n).sqrt();
        assert!(mean.abs() < 1_000.0);
        assert!((std - TARGET_NOISE_STD).abs() < 1_000.0);
    }

    #[test]
    fn test_expected_price_reference_row() {
        let row = [0.0, 5.0, 0.0, 15.0, 350.0, 10.0];
        assert!(expected_price(&row).abs() < 1e-9);

        let richer = [1.0, 6.0, 0.0, 15.0, 350.0, 10.0];
        assert!((expected_price(&richer) - 30_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_samples_rejected() {
        let config = SyntheticConfig {
            n_samples: 0,
            seed: 1,
        };
        assert!(matches!(
            generate(&config),
            Err(ModelError::InsufficientData { .. })
        ));
    }
}
