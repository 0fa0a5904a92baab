//! Delay prediction server
//!
//! Serves delay/cost predictions for construction projects over HTTP.
//! At startup the model artifact is loaded from disk; if it is missing,
//! the training dataset is generated (when absent) and a fresh model is
//! trained and persisted before the server accepts requests.

use anyhow::{Context, Result};
use predictor_lib::{
    artifact,
    dataset::{self, DatasetGenerator},
    health::components,
    predictor::MODEL_NAME,
    DelayPredictor, HealthRegistry, PredictorMetrics, StructuredLogger, Trainer,
};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use delay_server::{api, config};

const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting delay-server");

    let config = config::ServerConfig::load()?;
    info!(port = config.api_port, model_path = %config.model_path, "Server configured");

    let health = HealthRegistry::new();
    health.register(components::MODEL).await;
    health.register(components::DATASET).await;

    let metrics = PredictorMetrics::new();
    let logger = StructuredLogger::new("delay-server");

    let predictor = load_or_train(&config, &metrics)?;
    metrics.set_model_info(MODEL_NAME, &predictor.report.trained_at);
    metrics.set_dataset_rows(predictor.report.rows as i64);
    logger.log_startup(SERVER_VERSION, MODEL_NAME);

    let state = Arc::new(api::AppState {
        predictor: RwLock::new(predictor),
        health,
        metrics,
        logger: logger.clone(),
        model_path: config.model_path.clone().into(),
        dataset_path: config.dataset_path.clone().into(),
    });

    let api_handle = tokio::spawn(api::serve(config.api_port, state));

    tokio::signal::ctrl_c().await?;
    logger.log_shutdown("SIGINT received");
    info!("Shutting down");
    api_handle.abort();

    Ok(())
}

/// Load the persisted model, or build one from the dataset (generating
/// the dataset first when it does not exist)
fn load_or_train(
    config: &config::ServerConfig,
    metrics: &PredictorMetrics,
) -> Result<DelayPredictor> {
    if Path::new(&config.model_path).exists() {
        info!(path = %config.model_path, "Loading pre-trained model");
        return artifact::load(&config.model_path)
            .with_context(|| format!("failed to load model artifact {}", config.model_path));
    }

    if !Path::new(&config.dataset_path).exists() {
        info!(
            path = %config.dataset_path,
            rows = config.dataset_size,
            "Dataset not found, generating"
        );
        let rows = DatasetGenerator::new(config.generator_seed).generate(config.dataset_size);
        dataset::write_csv(&config.dataset_path, &rows)?;
    }

    info!(path = %config.dataset_path, "No pre-trained model found, training");
    let started = std::time::Instant::now();
    let rows = dataset::read_csv(&config.dataset_path)?;
    let predictor = Trainer::default().train(&rows)?;
    artifact::save(&predictor, &config.model_path)?;

    metrics.observe_training_latency(started.elapsed().as_secs_f64());
    metrics.inc_training_runs();

    Ok(predictor)
}
