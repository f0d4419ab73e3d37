use crate::features::feature_vector::FEATURE_DIM;

/// Maps a feature vector to a raw (unclamped) progress estimate.
pub trait ProgressRegressor: Send {
    fn predict(&self, features: &[f64; FEATURE_DIM]) -> Result<f64, Box<dyn std::error::Error>>;
}
