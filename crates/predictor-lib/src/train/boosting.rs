//! Gradient boosting regressor
//!
//! Least-squares boosting: each stage fits a shallow tree to the current
//! residuals. Staged predictions stay accessible because the confidence
//! heuristic uses the spread of the final stages.

use super::tree::{RegressionTree, TreeConfig};
use crate::error::{PredictorError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostingConfig {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub tree: TreeConfig,
}

impl Default for BoostingConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            tree: TreeConfig {
                max_depth: 6,
                min_samples_split: 2,
                min_samples_leaf: 1,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoosting {
    init: f64,
    learning_rate: f64,
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl GradientBoosting {
    pub fn fit(xs: &[Vec<f64>], ys: &[f64], config: &BoostingConfig) -> Result<Self> {
        if xs.is_empty() {
            return Err(PredictorError::EmptyDataset);
        }
        let n = xs.len();
        let n_features = xs[0].len();
        let indices: Vec<usize> = (0..n).collect();

        let init = ys.iter().sum::<f64>() / n as f64;
        let mut predictions = vec![init; n];
        let mut trees = Vec::with_capacity(config.n_estimators);

        for _ in 0..config.n_estimators {
            let residuals: Vec<f64> = ys
                .iter()
                .zip(&predictions)
                .map(|(y, p)| y - p)
                .collect();
            let tree = RegressionTree::fit(xs, &residuals, &indices, &config.tree);
            for (pred, x) in predictions.iter_mut().zip(xs) {
                *pred += config.learning_rate * tree.predict(x);
            }
            trees.push(tree);
        }

        Ok(Self {
            init,
            learning_rate: config.learning_rate,
            trees,
            n_features,
        })
    }

    pub fn predict(&self, x: &[f64]) -> f64 {
        self.init
            + self.learning_rate
                * self.trees.iter().map(|t| t.predict(x)).sum::<f64>()
    }

    /// Cumulative prediction after each boosting stage
    pub fn staged_predictions(&self, x: &[f64]) -> Vec<f64> {
        let mut staged = Vec::with_capacity(self.trees.len());
        let mut acc = self.init;
        for tree in &self.trees {
            acc += self.learning_rate * tree.predict(x);
            staged.push(acc);
        }
        staged
    }

    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    /// Summed impurity-decrease importances across stages, normalized
    pub fn feature_importances(&self) -> Vec<f64> {
        let mut totals = vec![0.0; self.n_features];
        for tree in &self.trees {
            for (total, value) in totals.iter_mut().zip(tree.feature_importances()) {
                *total += value;
            }
        }
        let sum: f64 = totals.iter().sum();
        if sum > f64::EPSILON {
            for total in &mut totals {
                *total /= sum;
            }
        }
        totals
    }
}
