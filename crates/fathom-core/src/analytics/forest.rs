//! Bagged regression trees
//!
//! CART trees split on the threshold that minimizes the summed squared error
//! of the two children. Each tree is fitted on a bootstrap sample drawn from a
//! seeded RNG; prediction averages the trees and involves no randomness.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::PredictorConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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

/// Growth limits for a single tree
#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
}

impl From<&PredictorConfig> for TreeParams {
    fn from(config: &PredictorConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split.max(2),
        }
    }
}

/// A fitted regression tree stored as a node arena (root at index 0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    sse: f64,
}

impl RegressionTree {
    /// Fit on the rows of `x` named by `sample` (duplicates allowed)
    pub fn fit(x: &[Vec<f64>], y: &[f64], sample: Vec<usize>, params: TreeParams) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.grow(x, y, sample, 0, params);
        tree
    }

    fn grow(
        &mut self,
        x: &[Vec<f64>],
        y: &[f64],
        sample: Vec<usize>,
        depth: usize,
        params: TreeParams,
    ) -> usize {
        let node_id = self.nodes.len();
        let value = mean(sample.iter().map(|&i| y[i]));
        self.nodes.push(Node::Leaf { value });

        let depth_exhausted = params.max_depth.is_some_and(|max| depth >= max);
        let pure = sample.iter().all(|&i| y[i] == y[sample[0]]);
        if sample.len() < params.min_samples_split || depth_exhausted || pure {
            return node_id;
        }

        let Some(split) = best_split(x, y, &sample) else {
            return node_id;
        };

        let (left, right): (Vec<usize>, Vec<usize>) = sample
            .into_iter()
            .partition(|&i| x[i][split.feature] <= split.threshold);

        let left = self.grow(x, y, left, depth + 1, params);
        let right = self.grow(x, y, right, depth + 1, params);
        self.nodes[node_id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node_id
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let v = row.get(*feature).copied().unwrap_or(0.0);
                    id = if v <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Number of nodes (leaves and splits)
    pub fn size(&self) -> usize {
        self.nodes.len()
    }
}

/// Exhaustive search over every feature and every boundary between distinct values
fn best_split(x: &[Vec<f64>], y: &[f64], sample: &[usize]) -> Option<BestSplit> {
    let n_features = x.get(sample[0]).map_or(0, Vec::len);
    let n = sample.len();
    let total_sum: f64 = sample.iter().map(|&i| y[i]).sum();
    let total_sq: f64 = sample.iter().map(|&i| y[i] * y[i]).sum();

    let mut best: Option<BestSplit> = None;
    let mut order = sample.to_vec();

    for feature in 0..n_features {
        order.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        for k in 1..n {
            let prev = order[k - 1];
            left_sum += y[prev];
            left_sq += y[prev] * y[prev];

            let lo = x[prev][feature];
            let hi = x[order[k]][feature];
            if lo == hi {
                continue;
            }

            let left_n = k as f64;
            let right_n = (n - k) as f64;
            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;
            let sse = (left_sq - left_sum * left_sum / left_n)
                + (right_sq - right_sum * right_sum / right_n);

            if best.as_ref().map_or(true, |b| sse < b.sse) {
                let mut threshold = (lo + hi) / 2.0;
                if threshold >= hi {
                    threshold = lo;
                }
                best = Some(BestSplit {
                    feature,
                    threshold,
                    sse,
                });
            }
        }
    }

    best
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Ensemble of bootstrap-fitted regression trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    /// Fit `config.n_trees` trees. With no rows every tree is a single zero leaf.
    pub fn fit(x: &[Vec<f64>], y: &[f64], config: &PredictorConfig) -> Self {
        let params = TreeParams::from(config);
        let mut rng = StdRng::seed_from_u64(config.seed);
        let n = x.len();

        let trees = (0..config.n_trees.max(1))
            .map(|_| {
                let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                RegressionTree::fit(x, y, sample, params)
            })
            .collect();

        Self { trees }
    }

    /// Mean of the tree predictions
    pub fn predict(&self, row: &[f64]) -> f64 {
        self.trees.iter().map(|t| t.predict(row)).sum::<f64>() / self.trees.len() as f64
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}
