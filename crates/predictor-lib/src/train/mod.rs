//! Ensemble training pipeline
//!
//! Fits the delay forest and the cost booster on a generated dataset,
//! evaluates both on a held-out split, and packages the result as a
//! ready-to-serve predictor.

mod boosting;
mod forest;
mod metrics;
mod scaler;
mod split;
mod tree;

pub use boosting::{BoostingConfig, GradientBoosting};
pub use forest::{ForestConfig, RandomForest};
pub use metrics::{mae, r2, rmse};
pub use scaler::StandardScaler;
pub use split::{k_folds, train_test_split};
pub use tree::{RegressionTree, TreeConfig};

use crate::error::{PredictorError, Result};
use crate::models::{DatasetRow, FEATURE_NAMES};
use crate::predictor::DelayPredictor;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

/// Minimum dataset size the trainer accepts
pub const MIN_TRAINING_ROWS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Fraction of rows held out for evaluation
    pub test_fraction: f64,
    pub seed: u64,
    /// Folds for cross-validated delay MAE; below 2 disables CV
    pub cv_folds: usize,
    pub forest: ForestConfig,
    pub boosting: BoostingConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
            cv_folds: 5,
            forest: ForestConfig::default(),
            boosting: BoostingConfig::default(),
        }
    }
}

/// Held-out evaluation metrics for one model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub mae: f64,
    pub rmse: f64,
    pub r2: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cv_mae: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// Everything worth reporting about a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub rows: usize,
    pub delay: ModelMetrics,
    pub cost: ModelMetrics,
    pub delay_importance: Vec<FeatureImportance>,
    pub cost_importance: Vec<FeatureImportance>,
    pub trained_at: String,
}

pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn train(&self, rows: &[DatasetRow]) -> Result<DelayPredictor> {
        if rows.is_empty() {
            return Err(PredictorError::EmptyDataset);
        }
        if rows.len() < MIN_TRAINING_ROWS {
            return Err(PredictorError::InsufficientData(rows.len()));
        }

        let started = Instant::now();
        let xs: Vec<Vec<f64>> = rows
            .iter()
            .map(|r| r.features().as_array().to_vec())
            .collect();
        let y_delay: Vec<f64> = rows.iter().map(|r| r.delay_days).collect();
        let y_cost: Vec<f64> = rows.iter().map(|r| r.additional_cost_usd).collect();

        let (train_idx, test_idx) =
            train_test_split(rows.len(), self.config.test_fraction, self.config.seed);

        let train_raw: Vec<Vec<f64>> = train_idx.iter().map(|&i| xs[i].clone()).collect();
        let scaler = StandardScaler::fit(&train_raw);
        let train_x = scaler.transform_all(&train_raw);
        let train_delay: Vec<f64> = train_idx.iter().map(|&i| y_delay[i]).collect();
        let train_cost: Vec<f64> = train_idx.iter().map(|&i| y_cost[i]).collect();

        info!(
            rows = rows.len(),
            train = train_idx.len(),
            test = test_idx.len(),
            "Training delay and cost models"
        );

        let delay_model = RandomForest::fit(&train_x, &train_delay, &self.config.forest)?;
        let cost_model = GradientBoosting::fit(&train_x, &train_cost, &self.config.boosting)?;

        let test_x: Vec<Vec<f64>> = test_idx.iter().map(|&i| scaler.transform(&xs[i])).collect();
        let test_delay: Vec<f64> = test_idx.iter().map(|&i| y_delay[i]).collect();
        let test_cost: Vec<f64> = test_idx.iter().map(|&i| y_cost[i]).collect();

        let delay_pred: Vec<f64> = test_x.iter().map(|x| delay_model.predict(x)).collect();
        let cost_pred: Vec<f64> = test_x.iter().map(|x| cost_model.predict(x)).collect();

        let cv_mae = self.cross_validate_delay(&train_x, &train_delay)?;

        let report = TrainingReport {
            rows: rows.len(),
            delay: ModelMetrics {
                mae: mae(&test_delay, &delay_pred),
                rmse: rmse(&test_delay, &delay_pred),
                r2: r2(&test_delay, &delay_pred),
                cv_mae,
            },
            cost: ModelMetrics {
                mae: mae(&test_cost, &cost_pred),
                rmse: rmse(&test_cost, &cost_pred),
                r2: r2(&test_cost, &cost_pred),
                cv_mae: None,
            },
            delay_importance: ranked_importances(&delay_model.feature_importances()),
            cost_importance: ranked_importances(&cost_model.feature_importances()),
            trained_at: chrono::Utc::now().to_rfc3339(),
        };

        info!(
            delay_mae = report.delay.mae,
            cost_mae = report.cost.mae,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Training completed"
        );

        Ok(DelayPredictor::new(scaler, delay_model, cost_model, report))
    }

    /// Mean k-fold MAE for the delay model on the training split
    fn cross_validate_delay(&self, xs: &[Vec<f64>], ys: &[f64]) -> Result<Option<f64>> {
        if self.config.cv_folds < 2 || xs.len() < self.config.cv_folds * 2 {
            return Ok(None);
        }

        let folds = k_folds(xs.len(), self.config.cv_folds, self.config.seed);
        let mut fold_maes = Vec::with_capacity(folds.len());
        for (train, test) in folds {
            let fold_x: Vec<Vec<f64>> = train.iter().map(|&i| xs[i].clone()).collect();
            let fold_y: Vec<f64> = train.iter().map(|&i| ys[i]).collect();
            let model = RandomForest::fit(&fold_x, &fold_y, &self.config.forest)?;

            let actual: Vec<f64> = test.iter().map(|&i| ys[i]).collect();
            let predicted: Vec<f64> = test.iter().map(|&i| model.predict(&xs[i])).collect();
            fold_maes.push(mae(&actual, &predicted));
        }

        Ok(Some(fold_maes.iter().sum::<f64>() / fold_maes.len() as f64))
    }
}

impl Default for Trainer {
    fn default() -> Self {
        Self::new(TrainingConfig::default())
    }
}

fn ranked_importances(importances: &[f64]) -> Vec<FeatureImportance> {
    let mut ranked: Vec<FeatureImportance> = FEATURE_NAMES
        .iter()
        .zip(importances)
        .map(|(name, &importance)| FeatureImportance {
            feature: name.to_string(),
            importance,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.importance
            .partial_cmp(&a.importance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}
