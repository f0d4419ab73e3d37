//! Change-point summary derived from a detector's segment boundaries.

use log::warn;
use ndarray::Array2;

use crate::analysis::domain::change_point_detector::ChangePointDetector;
use crate::shared::constants::MIN_CHUNKS_FOR_CHANGE_POINTS;

/// How the change-point features were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorStatus {
    /// The detector ran and its boundaries were summarized.
    Analyzed,
    /// Too few embeddings to attempt detection.
    InsufficientData,
    /// The detector failed; zeroed features were substituted.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangePointSummary {
    /// Number of interior change points (boundaries minus the end sentinel).
    pub count: usize,
    /// Index of the last interior change point, 0 when there is none.
    pub last_position: usize,
    pub status: DetectorStatus,
}

impl ChangePointSummary {
    fn zeroed(status: DetectorStatus) -> Self {
        Self {
            count: 0,
            last_position: 0,
            status,
        }
    }
}

/// Runs the detector over the embedding series and folds its boundaries
/// into count/position features.
///
/// Detector failure is non-fatal: the summary degrades to zeroes with
/// `DetectorStatus::Skipped` and the pipeline carries on.
pub fn summarize_change_points(
    detector: &dyn ChangePointDetector,
    embeddings: &[Vec<f32>],
    penalty: f64,
) -> ChangePointSummary {
    if embeddings.len() < MIN_CHUNKS_FOR_CHANGE_POINTS {
        return ChangePointSummary::zeroed(DetectorStatus::InsufficientData);
    }

    let series = to_series(embeddings);
    match detector.detect(&series, penalty) {
        Ok(boundaries) => summarize_boundaries(&boundaries),
        Err(err) => {
            warn!("change-point detection failed, using zeroed features: {err}");
            ChangePointSummary::zeroed(DetectorStatus::Skipped)
        }
    }
}

fn summarize_boundaries(boundaries: &[usize]) -> ChangePointSummary {
    let count = boundaries.len().saturating_sub(1);
    let last_position = if boundaries.len() > 1 {
        boundaries[boundaries.len() - 2]
    } else {
        0
    };
    ChangePointSummary {
        count,
        last_position,
        status: DetectorStatus::Analyzed,
    }
}

fn to_series(embeddings: &[Vec<f32>]) -> Array2<f64> {
    let rows = embeddings.len();
    let cols = embeddings.first().map_or(0, Vec::len);
    let mut series = Array2::zeros((rows, cols));
    for (i, embedding) in embeddings.iter().enumerate() {
        for (j, value) in embedding.iter().enumerate() {
            series[[i, j]] = f64::from(*value);
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedDetector {
        boundaries: Vec<usize>,
    }

    impl ChangePointDetector for FixedDetector {
        fn detect(
            &self,
            _series: &Array2<f64>,
            _penalty: f64,
        ) -> Result<Vec<usize>, Box<dyn std::error::Error>> {
            Ok(self.boundaries.clone())
        }
    }

    struct FailingDetector;

    impl ChangePointDetector for FailingDetector {
        fn detect(
            &self,
            _series: &Array2<f64>,
            _penalty: f64,
        ) -> Result<Vec<usize>, Box<dyn std::error::Error>> {
            Err("detector exploded".into())
        }
    }

    fn embeddings(n: usize) -> Vec<Vec<f32>> {
        (0..n).map(|i| vec![i as f32, 1.0]).collect()
    }

    #[test]
    fn too_few_embeddings_short_circuits() {
        let detector = FixedDetector {
            boundaries: vec![2],
        };
        let summary = summarize_change_points(&detector, &embeddings(2), 6.0);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.last_position, 0);
        assert_eq!(summary.status, DetectorStatus::InsufficientData);
    }

    #[test]
    fn end_sentinel_alone_means_no_change_points() {
        let detector = FixedDetector {
            boundaries: vec![5],
        };
        let summary = summarize_change_points(&detector, &embeddings(5), 6.0);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.last_position, 0);
        assert_eq!(summary.status, DetectorStatus::Analyzed);
    }

    #[test]
    fn interior_boundaries_are_counted_and_last_reported() {
        let detector = FixedDetector {
            boundaries: vec![3, 7, 10],
        };
        let summary = summarize_change_points(&detector, &embeddings(10), 6.0);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.last_position, 7);
        assert_eq!(summary.status, DetectorStatus::Analyzed);
    }

    #[test]
    fn detector_failure_degrades_to_zeroed_summary() {
        let summary = summarize_change_points(&FailingDetector, &embeddings(4), 6.0);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.last_position, 0);
        assert_eq!(summary.status, DetectorStatus::Skipped);
    }
}
