//! Core library for construction delay prediction
//!
//! This crate provides:
//! - Feature extraction from raw project attributes
//! - Synthetic dataset generation and CSV storage
//! - Ensemble regression training (random forest + gradient boosting)
//! - Prediction with heuristic confidence intervals
//! - Health checks and observability

pub mod artifact;
pub mod dataset;
pub mod error;
pub mod features;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod train;

pub use error::{PredictorError, Result};
pub use features::FeatureExtractor;
pub use health::{ComponentHealth, ComponentStatus, HealthRegistry, HealthSnapshot};
pub use models::*;
pub use observability::{PredictorMetrics, StructuredLogger};
pub use predictor::DelayPredictor;
pub use train::{Trainer, TrainingConfig, TrainingReport};
