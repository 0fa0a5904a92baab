//! Server configuration

use anyhow::Result;
use serde::Deserialize;

/// Prediction server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Path of the serialized model artifact
    #[serde(default = "default_model_path")]
    pub model_path: String,

    /// Path of the training dataset CSV
    #[serde(default = "default_dataset_path")]
    pub dataset_path: String,

    /// Rows to generate when the dataset is missing at startup
    #[serde(default = "default_dataset_size")]
    pub dataset_size: usize,

    /// Seed for dataset generation
    #[serde(default = "default_generator_seed")]
    pub generator_seed: u64,
}

fn default_api_port() -> u16 {
    5000
}

fn default_model_path() -> String {
    "construction_delay_model.json".to_string()
}

fn default_dataset_path() -> String {
    "construction_delay_dataset.csv".to_string()
}

fn default_dataset_size() -> usize {
    2000
}

fn default_generator_seed() -> u64 {
    42
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            model_path: default_model_path(),
            dataset_path: default_dataset_path(),
            dataset_size: default_dataset_size(),
            generator_seed: default_generator_seed(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from PREDICTOR_* environment variables
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("PREDICTOR"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_default())
    }
}
