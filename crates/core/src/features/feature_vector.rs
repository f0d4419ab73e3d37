//! Fixed-width feature vector fed to the progress regressor.

use crate::analysis::domain::change_point_analyzer::ChangePointSummary;
use crate::analysis::domain::novelty::NoveltyStats;
use crate::shared::constants::AVG_SPEECH_LEN;

pub const FEATURE_DIM: usize = 5;

/// Assembles the regression input:
/// `[chunks/40, novelty mean, novelty variance, change points, last change point/40]`.
pub fn build(
    chunk_count: usize,
    novelty: &NoveltyStats,
    change_points: &ChangePointSummary,
) -> [f64; FEATURE_DIM] {
    [
        chunk_count as f64 / AVG_SPEECH_LEN,
        novelty.mean,
        novelty.variance,
        change_points.count as f64,
        change_points.last_position as f64 / AVG_SPEECH_LEN,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::domain::change_point_analyzer::DetectorStatus;
    use approx::assert_relative_eq;

    #[test]
    fn features_are_ordered_and_normalized() {
        let novelty = NoveltyStats {
            mean: 0.4,
            variance: 0.02,
        };
        let change_points = ChangePointSummary {
            count: 3,
            last_position: 20,
            status: DetectorStatus::Analyzed,
        };
        let features = build(10, &novelty, &change_points);
        assert_relative_eq!(features[0], 0.25, epsilon = 1e-12);
        assert_relative_eq!(features[1], 0.4, epsilon = 1e-12);
        assert_relative_eq!(features[2], 0.02, epsilon = 1e-12);
        assert_relative_eq!(features[3], 3.0, epsilon = 1e-12);
        assert_relative_eq!(features[4], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn zeroed_inputs_give_mostly_zero_features() {
        let features = build(
            2,
            &NoveltyStats::default(),
            &ChangePointSummary {
                count: 0,
                last_position: 0,
                status: DetectorStatus::InsufficientData,
            },
        );
        assert_relative_eq!(features[0], 0.05, epsilon = 1e-12);
        assert_eq!(&features[1..], &[0.0, 0.0, 0.0, 0.0][..]);
    }
}
