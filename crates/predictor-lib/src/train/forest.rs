//! Random forest regressor
//!
//! Bagged regression trees; per-tree predictions stay accessible because
//! the confidence heuristic needs their spread.

use super::tree::{RegressionTree, TreeConfig};
use crate::error::{PredictorError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestConfig {
    pub n_estimators: usize,
    pub tree: TreeConfig,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            tree: TreeConfig {
                max_depth: 10,
                min_samples_split: 5,
                min_samples_leaf: 2,
            },
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl RandomForest {
    pub fn fit(xs: &[Vec<f64>], ys: &[f64], config: &ForestConfig) -> Result<Self> {
        if xs.is_empty() {
            return Err(PredictorError::EmptyDataset);
        }
        let n = xs.len();
        let n_features = xs[0].len();
        let mut rng = StdRng::seed_from_u64(config.seed);

        let trees = (0..config.n_estimators)
            .map(|_| {
                let sample: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
                RegressionTree::fit(xs, ys, &sample, &config.tree)
            })
            .collect();

        Ok(Self { trees, n_features })
    }

    /// Ensemble mean prediction
    pub fn predict(&self, x: &[f64]) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.predict(x)).sum();
        sum / self.trees.len().max(1) as f64
    }

    /// One prediction per tree, for variance-based confidence estimation
    pub fn tree_predictions(&self, x: &[f64]) -> Vec<f64> {
        self.trees.iter().map(|t| t.predict(x)).collect()
    }

    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    /// Mean impurity-decrease importances, normalized to sum to 1
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
