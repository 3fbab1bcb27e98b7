//! # train-and-export
//!
//! Generates the synthetic housing dataset, fits the scaler + gradient
//! boosting pipeline on all of it and writes the artifact the prediction
//! service loads at startup.
//!
//! The printed R^2 is computed on the training data itself, so it is an
//! optimistic fit-quality figure rather than a generalization estimate.

use anyhow::Context;
use clap::Parser;
use housing::{generate, SyntheticConfig, DEFAULT_MODEL_PATH};
use pipeline_core::artifact;
use pipeline_core::prelude::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "train-and-export")]
#[command(about = "Fit the housing price pipeline on synthetic data and save it", long_about = None)]
struct Cli {
    /// Where to write the fitted pipeline
    #[arg(short, long, default_value = DEFAULT_MODEL_PATH)]
    output: PathBuf,

    /// Number of synthetic rows
    #[arg(short = 'n', long, default_value = "5000")]
    samples: usize,

    /// Seed for data generation and row subsampling
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Number of boosting stages
    #[arg(long, default_value = "100")]
    n_estimators: usize,

    /// Shrinkage applied to each tree
    #[arg(long, default_value = "0.1")]
    learning_rate: f64,

    /// Maximum depth of each tree
    #[arg(long, default_value = "3")]
    max_depth: usize,

    /// Fraction of rows used per stage
    #[arg(long, default_value = "1.0")]
    subsample: f64,
}

/// Outcome of a training run
#[derive(Debug)]
struct TrainingSummary {
    r_squared: f64,
    importances: Vec<(String, f64)>,
    output: PathBuf,
}

fn run_train(cli: &Cli) -> anyhow::Result<TrainingSummary> {
    let data = generate(&SyntheticConfig {
        n_samples: cli.samples,
        seed: cli.seed,
    })
    .context("Failed to generate synthetic data")?;
    tracing::info!(
        rows = data.features.n_rows(),
        features = data.features.n_features(),
        "Synthetic dataset generated"
    );

    let params = GradientBoostingParams {
        n_estimators: cli.n_estimators,
        learning_rate: cli.learning_rate,
        max_depth: cli.max_depth,
        subsample: cli.subsample,
        seed: cli.seed,
        ..GradientBoostingParams::default()
    };
    let regressor = GradientBoostingRegressor::new(params).context("Invalid model parameters")?;

    let mut model = Pipeline::new(StandardScaler::new(), regressor);
    model
        .fit(&data.features, &data.target)
        .context("Failed to fit pipeline")?;

    let predictions = model.predict(&data.features)?;
    let r_squared = r2_score(&data.target, &predictions);

    artifact::save(&model, &cli.output)
        .with_context(|| format!("Failed to save model to {}", cli.output.display()))?;

    Ok(TrainingSummary {
        r_squared,
        importances: model.feature_importances(),
        output: cli.output.clone(),
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    match run_train(&cli) {
        Ok(summary) => {
            println!("Training R^2 on synthetic data: {:.3}", summary.r_squared);
            println!("Feature importances:");
            for (name, importance) in &summary.importances {
                println!("  {:<8} {:.3}", name, importance);
            }
            println!("Saved model to {}", summary.output.display());
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
