//! End-to-end progress prediction over a partial transcript.

use log::{debug, warn};

use crate::analysis::domain::change_point_analyzer::{self, DetectorStatus};
use crate::analysis::domain::change_point_detector::ChangePointDetector;
use crate::analysis::domain::novelty;
use crate::embedding::domain::text_embedder::TextEmbedder;
use crate::features::feature_vector;
use crate::regression::domain::progress_regressor::ProgressRegressor;
use crate::segmentation::segmenter;
use crate::shared::constants::{
    HEURISTIC_LONG_PREDICTION, HEURISTIC_MEDIUM_PREDICTION, HEURISTIC_MEDIUM_WORDS,
    HEURISTIC_SHORT_PREDICTION, HEURISTIC_SHORT_WORDS, MIN_CHUNKS_FOR_PIPELINE, PELT_PENALTY,
    SHORT_TRANSCRIPT_PREDICTION,
};

/// Which path produced the prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionMode {
    /// Full pipeline: embeddings, change points, regression.
    Regression,
    /// Too few chunks to run the pipeline at all.
    TooShort,
    /// A stage failed; the word-count heuristic answered instead.
    DegradedHeuristic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionReport {
    /// Progress percentage in [0, 100], rounded to two decimals.
    pub prediction: f64,
    pub mode: PredictionMode,
    /// Present only when the regression path ran.
    pub detector_status: Option<DetectorStatus>,
}

#[derive(Debug, thiserror::Error)]
enum StageFailure {
    #[error("embedding failed: {0}")]
    Embedding(Box<dyn std::error::Error>),
    #[error("regression failed: {0}")]
    Regression(Box<dyn std::error::Error>),
}

/// Orchestrates the prediction stages behind injected collaborators.
///
/// Never fails: short transcripts get a fixed early estimate, and any
/// stage failure downgrades to the word-count heuristic.
pub struct PredictProgressUseCase {
    embedder: Box<dyn TextEmbedder>,
    regressor: Box<dyn ProgressRegressor>,
    detector: Box<dyn ChangePointDetector>,
}

impl PredictProgressUseCase {
    pub fn new(
        embedder: Box<dyn TextEmbedder>,
        regressor: Box<dyn ProgressRegressor>,
        detector: Box<dyn ChangePointDetector>,
    ) -> Self {
        Self {
            embedder,
            regressor,
            detector,
        }
    }

    pub fn predict(&self, transcript: &str) -> PredictionReport {
        let chunks = segmenter::segment(transcript);
        if chunks.len() < MIN_CHUNKS_FOR_PIPELINE {
            debug!("{} chunk(s), returning early estimate", chunks.len());
            return PredictionReport {
                prediction: SHORT_TRANSCRIPT_PREDICTION,
                mode: PredictionMode::TooShort,
                detector_status: None,
            };
        }

        match self.run_regression(&chunks) {
            Ok((prediction, detector_status)) => PredictionReport {
                prediction,
                mode: PredictionMode::Regression,
                detector_status: Some(detector_status),
            },
            Err(failure) => {
                warn!("{failure}, falling back to word-count heuristic");
                PredictionReport {
                    prediction: word_count_heuristic(transcript),
                    mode: PredictionMode::DegradedHeuristic,
                    detector_status: None,
                }
            }
        }
    }

    fn run_regression(&self, chunks: &[String]) -> Result<(f64, DetectorStatus), StageFailure> {
        let embeddings = self
            .embedder
            .embed(chunks)
            .map_err(StageFailure::Embedding)?;

        let novelty = novelty::novelty_stats(&embeddings);
        let change_points = change_point_analyzer::summarize_change_points(
            self.detector.as_ref(),
            &embeddings,
            PELT_PENALTY,
        );

        let features = feature_vector::build(chunks.len(), &novelty, &change_points);
        debug!("features: {features:?}");

        let raw = self
            .regressor
            .predict(&features)
            .map_err(StageFailure::Regression)?;
        Ok((clamp_round(raw), change_points.status))
    }
}

fn clamp_round(raw: f64) -> f64 {
    (raw.clamp(0.0, 100.0) * 100.0).round() / 100.0
}

fn word_count_heuristic(transcript: &str) -> f64 {
    let words = segmenter::word_count(transcript);
    if words < HEURISTIC_SHORT_WORDS {
        HEURISTIC_SHORT_PREDICTION
    } else if words < HEURISTIC_MEDIUM_WORDS {
        HEURISTIC_MEDIUM_PREDICTION
    } else {
        HEURISTIC_LONG_PREDICTION
    }
}
