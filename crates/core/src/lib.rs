//! Talk-progress estimation from partial speech transcripts.
//!
//! Segments a transcript into sentence chunks, derives a fixed-width
//! feature vector from embedding novelty and change-point statistics, and
//! maps it to a 0-100 progress percentage through a regression forest.
//! Deterministic fallbacks keep every request answerable when the
//! embedding or regression collaborators fail.

pub mod analysis;
pub mod embedding;
pub mod features;
pub mod pipeline;
pub mod regression;
pub mod segmentation;
pub mod shared;
