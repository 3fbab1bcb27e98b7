//! # housing-server
//!
//! Loads the fitted pipeline and serves `GET /` and `POST /predict`.
//! The process refuses to start without a readable model artifact.

use anyhow::Context;
use housing_server::config::ServerConfig;
use housing_server::{app, load_model, startup_error, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "housing_server=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let addr = config.socket_addr()?;

    let model = load_model(&config.model_path).map_err(|e| {
        tracing::error!(error = %e, "Failed to load model");
        startup_error(e)
    })?;

    let state = AppState::new(Arc::new(model));

    tracing::info!(
        "housing-server v{} listening on {}",
        env!("CARGO_PKG_VERSION"),
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
