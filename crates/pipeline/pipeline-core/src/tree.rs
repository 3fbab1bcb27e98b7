//! Regression trees
//!
//! CART-style binary trees fitted to minimise squared error. Splits are
//! found greedily by scanning every feature's sorted values and scoring
//! each boundary with Friedman's improvement
//! `n_left * n_right / n * (mean_left - mean_right)^2`, which equals the
//! reduction in the sum of squared errors.

use pipeline_spi::{FeatureFrame, ModelError, Result};
use serde::{Deserialize, Serialize};

/// Stopping rules for tree growth
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    /// Maximum depth; the root is at depth 0
    pub max_depth: usize,
    /// Minimum rows a node needs before it may be split
    pub min_samples_split: usize,
    /// Minimum rows on each side of a split
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 3,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

impl TreeParams {
    pub fn validate(&self) -> Result<()> {
        if self.max_depth < 1 {
            return Err(ModelError::InvalidParameter {
                name: "max_depth".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.min_samples_split < 2 {
            return Err(ModelError::InvalidParameter {
                name: "min_samples_split".to_string(),
                reason: "must be at least 2".to_string(),
            });
        }
        if self.min_samples_leaf < 1 {
            return Err(ModelError::InvalidParameter {
                name: "min_samples_leaf".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
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

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    improvement: f64,
}

/// Binary regression tree
///
/// Rows with `x[feature] <= threshold` go left.
///
/// # Example
///
/// ```rust
/// use pipeline_core::tree::{RegressionTree, TreeParams};
/// use pipeline_core::FeatureFrame;
///
/// let frame = FeatureFrame::new(vec!["x".to_string()], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let target = [0.0, 0.0, 10.0, 10.0];
///
/// let mut tree = RegressionTree::new(TreeParams::default()).unwrap();
/// tree.fit(&frame, &target, &[0, 1, 2, 3]).unwrap();
/// assert_eq!(tree.predict_row(&[1.5]), 0.0);
/// assert_eq!(tree.predict_row(&[3.5]), 10.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    params: TreeParams,
    nodes: Vec<Node>,
    /// Total squared-error reduction credited to each feature
    improvements: Vec<f64>,
}

impl RegressionTree {
    pub fn new(params: TreeParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            nodes: Vec::new(),
            improvements: Vec::new(),
        })
    }

    /// Fit the tree on the rows listed in `sample`
    pub fn fit(&mut self, frame: &FeatureFrame, target: &[f64], sample: &[usize]) -> Result<()> {
        if target.len() != frame.n_rows() {
            return Err(ModelError::ShapeMismatch {
                expected: format!("{} target values", frame.n_rows()),
                actual: format!("{} target values", target.len()),
            });
        }
        if sample.is_empty() {
            return Err(ModelError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }
        if let Some(&bad) = sample.iter().find(|&&i| i >= frame.n_rows()) {
            return Err(ModelError::InvalidData(format!(
                "sample index {} out of range for {} rows",
                bad,
                frame.n_rows()
            )));
        }

        self.nodes.clear();
        self.improvements = vec![0.0; frame.n_features()];

        let mut indices = sample.to_vec();
        self.grow(frame, target, &mut indices, 0);
        Ok(())
    }

    /// Predict a single row
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(Node::Leaf { value }) => return *value,
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                None => return 0.0,
            }
        }
    }

    pub fn is_fitted(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// Number of nodes, leaves included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of the deepest leaf
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match &nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }

        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }

    /// Raw per-feature squared-error reduction
    pub fn improvements(&self) -> &[f64] {
        &self.improvements
    }

    /// Check that the node layout can be walked for rows of `n_features`
    ///
    /// Children must come after their parent, so every walk terminates.
    pub fn validate(&self, n_features: usize) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(ModelError::NotFitted);
        }
        if self.improvements.len() != n_features {
            return Err(ModelError::ShapeMismatch {
                expected: format!("{} feature improvements", n_features),
                actual: format!("{} feature improvements", self.improvements.len()),
            });
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            let Node::Split {
                feature,
                left,
                right,
                ..
            } = node
            else {
                continue;
            };
            if *feature >= n_features {
                return Err(ModelError::InvalidData(format!(
                    "node {} splits on feature {} but rows have {} features",
                    idx, feature, n_features
                )));
            }
            for child in [*left, *right] {
                if child <= idx || child >= self.nodes.len() {
                    return Err(ModelError::InvalidData(format!(
                        "node {} has child index {} outside {}..{}",
                        idx,
                        child,
                        idx + 1,
                        self.nodes.len()
                    )));
                }
            }
        }
        Ok(())
    }

    fn grow(
        &mut self,
        frame: &FeatureFrame,
        target: &[f64],
        indices: &mut [usize],
        depth: usize,
    ) -> usize {
        let n = indices.len();
        let sum: f64 = indices.iter().map(|&i| target[i]).sum();
        let mean = sum / n as f64;
        let sse: f64 = indices.iter().map(|&i| (target[i] - mean).powi(2)).sum();

        let node_idx = self.nodes.len();
        self.nodes.push(Node::Leaf { value: mean });

        let splittable = depth < self.params.max_depth
            && n >= self.params.min_samples_split
            && n >= 2 * self.params.min_samples_leaf
            && sse > f64::EPSILON * n as f64;
        if !splittable {
            return node_idx;
        }

        let Some(split) = self.best_split(frame, target, indices) else {
            return node_idx;
        };

        let n_left = partition(indices, |i| frame.row(i)[split.feature] <= split.threshold);
        let (left_rows, right_rows) = indices.split_at_mut(n_left);

        self.improvements[split.feature] += split.improvement;
        let left = self.grow(frame, target, left_rows, depth + 1);
        let right = self.grow(frame, target, right_rows, depth + 1);

        self.nodes[node_idx] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node_idx
    }

    fn best_split(
        &self,
        frame: &FeatureFrame,
        target: &[f64],
        indices: &[usize],
    ) -> Option<SplitCandidate> {
        let n = indices.len();
        let min_leaf = self.params.min_samples_leaf;
        let total: f64 = indices.iter().map(|&i| target[i]).sum();

        let mut best: Option<SplitCandidate> = None;
        let mut pairs: Vec<(f64, f64)> = Vec::with_capacity(n);

        for feature in 0..frame.n_features() {
            pairs.clear();
            pairs.extend(indices.iter().map(|&i| (frame.row(i)[feature], target[i])));
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_sum = 0.0;
            for k in 1..n {
                left_sum += pairs[k - 1].1;

                let (lo, hi) = (pairs[k - 1].0, pairs[k].0);
                if lo >= hi || k < min_leaf || n - k < min_leaf {
                    continue;
                }

                let n_left = k as f64;
                let n_right = (n - k) as f64;
                let diff = left_sum / n_left - (total - left_sum) / n_right;
                let improvement = n_left * n_right / n as f64 * diff * diff;

                if best.map_or(true, |b| improvement > b.improvement) {
                    let mid = lo + (hi - lo) / 2.0;
                    best = Some(SplitCandidate {
                        feature,
                        threshold: if mid < hi { mid } else { lo },
                        improvement,
                    });
                }
            }
        }

        best.filter(|b| b.improvement > 0.0)
    }
}

/// Reorder `indices` so rows matching `pred` come first; returns their count
fn partition<F>(indices: &mut [usize], pred: F) -> usize
where
    F: Fn(usize) -> bool,
{
    let mut boundary = 0;
    for k in 0..indices.len() {
        if pred(indices[k]) {
            indices.swap(boundary, k);
            boundary += 1;
        }
    }
    boundary
}
