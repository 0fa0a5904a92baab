//! CART regression tree
//!
//! Variance-reduction splits over sorted feature values, arena-allocated
//! nodes. Trees are the shared building block for both ensembles.

use serde::{Deserialize, Serialize};

/// Growth limits for a single tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted regression tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
    /// Total squared-error reduction attributed to each feature
    importances: Vec<f64>,
}

impl RegressionTree {
    /// Fit on the rows selected by `indices`
    pub fn fit(xs: &[Vec<f64>], ys: &[f64], indices: &[usize], config: &TreeConfig) -> Self {
        let n_features = xs.first().map(|r| r.len()).unwrap_or(0);
        let mut tree = Self {
            nodes: Vec::new(),
            importances: vec![0.0; n_features],
        };
        tree.build(xs, ys, indices.to_vec(), 0, config);
        tree
    }

    pub fn predict(&self, x: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Unnormalized impurity-decrease importances
    pub fn feature_importances(&self) -> &[f64] {
        &self.importances
    }

    fn build(
        &mut self,
        xs: &[Vec<f64>],
        ys: &[f64],
        indices: Vec<usize>,
        depth: usize,
        config: &TreeConfig,
    ) -> usize {
        let n = indices.len();
        let sum: f64 = indices.iter().map(|&i| ys[i]).sum();
        let sum_sq: f64 = indices.iter().map(|&i| ys[i] * ys[i]).sum();
        let mean = if n > 0 { sum / n as f64 } else { 0.0 };
        let node_sse = sum_sq - sum * sum / n.max(1) as f64;

        let is_leaf = depth >= config.max_depth
            || n < config.min_samples_split
            || node_sse <= f64::EPSILON;

        if !is_leaf {
            if let Some(split) = best_split(xs, ys, &indices, config) {
                self.importances[split.feature] += node_sse - split.children_sse;

                // Reserve the slot so children indices stay consistent
                let node_idx = self.nodes.len();
                self.nodes.push(Node::Leaf { value: mean });

                let left = self.build(xs, ys, split.left_indices, depth + 1, config);
                let right = self.build(xs, ys, split.right_indices, depth + 1, config);
                self.nodes[node_idx] = Node::Split {
                    feature: split.feature,
                    threshold: split.threshold,
                    left,
                    right,
                };
                return node_idx;
            }
        }

        let node_idx = self.nodes.len();
        self.nodes.push(Node::Leaf { value: mean });
        node_idx
    }
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    children_sse: f64,
    left_indices: Vec<usize>,
    right_indices: Vec<usize>,
}

/// Exhaustive best split: every feature, every distinct threshold
fn best_split(
    xs: &[Vec<f64>],
    ys: &[f64],
    indices: &[usize],
    config: &TreeConfig,
) -> Option<SplitCandidate> {
    let n = indices.len();
    let n_features = xs.first().map(|r| r.len()).unwrap_or(0);
    let mut best: Option<SplitCandidate> = None;

    for feature in 0..n_features {
        let mut sorted: Vec<usize> = indices.to_vec();
        sorted.sort_by(|&a, &b| {
            xs[a][feature]
                .partial_cmp(&xs[b][feature])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // Prefix sums of y and y^2 in sorted order
        let mut prefix_sum = vec![0.0; n + 1];
        let mut prefix_sum_sq = vec![0.0; n + 1];
        for (i, &idx) in sorted.iter().enumerate() {
            prefix_sum[i + 1] = prefix_sum[i] + ys[idx];
            prefix_sum_sq[i + 1] = prefix_sum_sq[i] + ys[idx] * ys[idx];
        }

        for i in 1..n {
            let prev = xs[sorted[i - 1]][feature];
            let curr = xs[sorted[i]][feature];
            if curr <= prev {
                continue;
            }
            if i < config.min_samples_leaf || n - i < config.min_samples_leaf {
                continue;
            }

            let left_n = i as f64;
            let right_n = (n - i) as f64;
            let left_sum = prefix_sum[i];
            let right_sum = prefix_sum[n] - left_sum;
            let left_sse = prefix_sum_sq[i] - left_sum * left_sum / left_n;
            let right_sse =
                (prefix_sum_sq[n] - prefix_sum_sq[i]) - right_sum * right_sum / right_n;
            let children_sse = left_sse + right_sse;

            if best
                .as_ref()
                .map(|b| children_sse < b.children_sse)
                .unwrap_or(true)
            {
                best = Some(SplitCandidate {
                    feature,
                    threshold: (prev + curr) / 2.0,
                    children_sse,
                    left_indices: sorted[..i].to_vec(),
                    right_indices: sorted[i..].to_vec(),
                });
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_data() -> (Vec<Vec<f64>>, Vec<f64>) {
        // y = 0 for x < 5, y = 10 for x >= 5
        let xs: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
        let ys: Vec<f64> = (0..10).map(|i| if i < 5 { 0.0 } else { 10.0 }).collect();
        (xs, ys)
    }

    #[test]
    fn test_tree_learns_step_function() {
        let (xs, ys) = step_data();
        let indices: Vec<usize> = (0..xs.len()).collect();
        let tree = RegressionTree::fit(&xs, &ys, &indices, &TreeConfig::default());

        assert_eq!(tree.predict(&[2.0]), 0.0);
        assert_eq!(tree.predict(&[7.0]), 10.0);
    }

    #[test]
    fn test_constant_target_gives_single_leaf() {
        let xs: Vec<Vec<f64>> = (0..8).map(|i| vec![i as f64]).collect();
        let ys = vec![3.5; 8];
        let indices: Vec<usize> = (0..8).collect();
        let tree = RegressionTree::fit(&xs, &ys, &indices, &TreeConfig::default());

        assert_eq!(tree.nodes.len(), 1);
        assert_eq!(tree.predict(&[100.0]), 3.5);
    }

    #[test]
    fn test_max_depth_zero_predicts_mean() {
        let (xs, ys) = step_data();
        let indices: Vec<usize> = (0..xs.len()).collect();
        let config = TreeConfig {
            max_depth: 0,
            ..TreeConfig::default()
        };
        let tree = RegressionTree::fit(&xs, &ys, &indices, &config);

        assert_eq!(tree.predict(&[0.0]), 5.0);
    }

    #[test]
    fn test_min_samples_leaf_respected() {
        let (xs, ys) = step_data();
        let indices: Vec<usize> = (0..xs.len()).collect();
        let config = TreeConfig {
            max_depth: 10,
            min_samples_split: 2,
            min_samples_leaf: 6,
        };
        let tree = RegressionTree::fit(&xs, &ys, &indices, &config);

        // No split can leave 6 samples on both sides of 10 rows
        assert_eq!(tree.nodes.len(), 1);
    }

    #[test]
    fn test_importance_lands_on_informative_feature() {
        // Feature 0 carries the signal, feature 1 is constant noise
        let xs: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64, 1.0]).collect();
        let ys: Vec<f64> = (0..10).map(|i| if i < 5 { 0.0 } else { 10.0 }).collect();
        let indices: Vec<usize> = (0..10).collect();
        let tree = RegressionTree::fit(&xs, &ys, &indices, &TreeConfig::default());

        let importances = tree.feature_importances();
        assert!(importances[0] > 0.0);
        assert_eq!(importances[1], 0.0);
    }

    #[test]
    fn test_deeper_tree_fits_finer_structure() {
        let xs: Vec<Vec<f64>> = (0..16).map(|i| vec![i as f64]).collect();
        let ys: Vec<f64> = (0..16).map(|i| (i / 4) as f64).collect();
        let indices: Vec<usize> = (0..16).collect();
        let tree = RegressionTree::fit(&xs, &ys, &indices, &TreeConfig::default());

        for (i, y) in ys.iter().enumerate() {
            assert_eq!(tree.predict(&[i as f64]), *y);
        }
    }
}
