//! Prediction engine
//!
//! Wraps the fitted scaler and ensembles behind a single predict call.
//! The whole bundle serializes as the on-disk model artifact and is
//! immutable for the life of the serving process (retraining swaps it
//! wholesale).

pub mod confidence;

use crate::models::{DelayPrediction, FeatureVector, FEATURE_NAMES};
use crate::train::{GradientBoosting, RandomForest, StandardScaler, TrainingReport};
use serde::{Deserialize, Serialize};

/// Model identifier reported by the API
pub const MODEL_NAME: &str = "random_forest+gradient_boosting";

/// A trained delay/cost predictor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayPredictor {
    scaler: StandardScaler,
    delay_model: RandomForest,
    cost_model: GradientBoosting,
    pub report: TrainingReport,
}

impl DelayPredictor {
    pub(crate) fn new(
        scaler: StandardScaler,
        delay_model: RandomForest,
        cost_model: GradientBoosting,
        report: TrainingReport,
    ) -> Self {
        Self {
            scaler,
            delay_model,
            cost_model,
            report,
        }
    }

    /// Predict delay and additional cost with heuristic confidence bounds
    pub fn predict(&self, features: &FeatureVector) -> DelayPrediction {
        let scaled = self.scaler.transform(&features.as_array());

        let tree_predictions = self.delay_model.tree_predictions(&scaled);
        let delay = self.delay_model.predict(&scaled).max(0.0);
        let mut delay_interval = confidence::ensemble_interval(&tree_predictions);

        let staged = self.cost_model.staged_predictions(&scaled);
        let cost = staged.last().copied().unwrap_or(0.0).max(0.0);
        let mut cost_interval = confidence::staged_interval(&staged);

        delay_interval.lower = round1(delay_interval.lower);
        delay_interval.upper = round1(delay_interval.upper);
        cost_interval.lower = round2(cost_interval.lower);
        cost_interval.upper = round2(cost_interval.upper);

        DelayPrediction {
            delay_days: round1(delay),
            additional_cost_usd: round2(cost),
            delay_interval,
            cost_interval,
            confidence_pct: confidence::overall_confidence(features),
        }
    }

    pub fn feature_names(&self) -> &'static [&'static str] {
        &FEATURE_NAMES
    }

    pub fn model_name(&self) -> &'static str {
        MODEL_NAME
    }

    pub fn delay_estimators(&self) -> usize {
        self.delay_model.n_estimators()
    }

    pub fn cost_estimators(&self) -> usize {
        self.cost_model.n_estimators()
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
