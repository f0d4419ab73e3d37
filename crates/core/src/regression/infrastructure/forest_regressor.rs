//! Random-forest regression over a JSON tree artifact.

use std::fs;
use std::path::Path;

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::features::feature_vector::FEATURE_DIM;
use crate::regression::domain::progress_regressor::ProgressRegressor;

const SYNTHETIC_SAMPLES: usize = 100;
const SYNTHETIC_TREES: usize = 10;

/// One node of a regression tree. Trees are stored fully expanded in the
/// artifact, so inference is a plain root-to-leaf walk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
    Leaf {
        value: f64,
    },
}

impl TreeNode {
    fn evaluate(&self, features: &[f64; FEATURE_DIM]) -> f64 {
        match self {
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if features[*feature] <= *threshold {
                    left.evaluate(features)
                } else {
                    right.evaluate(features)
                }
            }
            TreeNode::Leaf { value } => *value,
        }
    }

    fn max_feature_index(&self) -> Option<usize> {
        match self {
            TreeNode::Split {
                feature,
                left,
                right,
                ..
            } => [Some(*feature), left.max_feature_index(), right.max_feature_index()]
                .into_iter()
                .flatten()
                .max(),
            TreeNode::Leaf { .. } => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ForestLoadError {
    #[error("failed to read model artifact {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse model artifact {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct ForestArtifact {
    trees: Vec<TreeNode>,
}

/// Ensemble of regression trees; the prediction is the mean of the trees.
pub struct ForestRegressor {
    trees: Vec<TreeNode>,
}

impl ForestRegressor {
    /// Loads a trained forest from a JSON artifact.
    ///
    /// An unreadable or malformed artifact is an error; callers decide
    /// whether a missing file warrants the synthetic substitute instead.
    pub fn load(path: &Path) -> Result<Self, ForestLoadError> {
        let raw = fs::read_to_string(path).map_err(|source| ForestLoadError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let artifact: ForestArtifact =
            serde_json::from_str(&raw).map_err(|source| ForestLoadError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_trees(artifact.trees)
    }

    fn from_trees(trees: Vec<TreeNode>) -> Result<Self, ForestLoadError> {
        if trees.is_empty() {
            return Err(ForestLoadError::Invalid("forest has no trees".into()));
        }
        for tree in &trees {
            if let Some(index) = tree.max_feature_index() {
                if index >= FEATURE_DIM {
                    return Err(ForestLoadError::Invalid(format!(
                        "split references feature {index}, expected < {FEATURE_DIM}"
                    )));
                }
            }
        }
        Ok(Self { trees })
    }

    /// Builds a substitute forest fit to seeded uniform noise.
    ///
    /// Its outputs carry no signal; it exists so the pipeline stays
    /// exercisable when no trained artifact is present. The same seed
    /// always produces the same forest.
    pub fn synthetic(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let samples: Vec<[f64; FEATURE_DIM]> = (0..SYNTHETIC_SAMPLES)
            .map(|_| std::array::from_fn(|_| rng.gen::<f64>()))
            .collect();
        let targets: Vec<f64> = (0..SYNTHETIC_SAMPLES)
            .map(|_| rng.gen::<f64>() * 100.0)
            .collect();

        let trees = (0..SYNTHETIC_TREES)
            .map(|i| fit_stump(&samples, &targets, i % FEATURE_DIM))
            .collect();
        info!("built synthetic substitute forest (seed {seed})");
        Self { trees }
    }
}

impl ProgressRegressor for ForestRegressor {
    fn predict(&self, features: &[f64; FEATURE_DIM]) -> Result<f64, Box<dyn std::error::Error>> {
        let sum: f64 = self.trees.iter().map(|tree| tree.evaluate(features)).sum();
        Ok(sum / self.trees.len() as f64)
    }
}

/// Depth-1 tree on one feature: split at the feature's mean, each leaf
/// holds the mean target of its side.
fn fit_stump(samples: &[[f64; FEATURE_DIM]], targets: &[f64], feature: usize) -> TreeNode {
    let threshold =
        samples.iter().map(|s| s[feature]).sum::<f64>() / samples.len() as f64;
    let overall = targets.iter().sum::<f64>() / targets.len() as f64;

    let side_mean = |left: bool| {
        let (sum, count) = samples
            .iter()
            .zip(targets)
            .filter(|(s, _)| (s[feature] <= threshold) == left)
            .fold((0.0, 0usize), |(sum, count), (_, t)| (sum + t, count + 1));
        if count == 0 {
            overall
        } else {
            sum / count as f64
        }
    };

    TreeNode::Split {
        feature,
        threshold,
        left: Box::new(TreeNode::Leaf {
            value: side_mean(true),
        }),
        right: Box::new(TreeNode::Leaf {
            value: side_mean(false),
        }),
    }
}
