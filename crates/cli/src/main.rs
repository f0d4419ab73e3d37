use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use talkgauge_core::analysis::infrastructure::pelt_detector::PeltDetector;
use talkgauge_core::embedding::infrastructure::onnx_sentence_embedder::OnnxSentenceEmbedder;
use talkgauge_core::pipeline::predict_use_case::{PredictProgressUseCase, PredictionMode};
use talkgauge_core::regression::infrastructure::forest_regressor::ForestRegressor;
use talkgauge_core::shared::constants::{
    EMBEDDING_MODEL_NAME, EMBEDDING_MODEL_URL, EMBEDDING_VOCAB_NAME, EMBEDDING_VOCAB_URL,
    MODEL_ARTIFACT_DIRNAME, MODEL_ARTIFACT_FILENAME, SYNTHETIC_MODEL_SEED,
};
use talkgauge_core::shared::model_resolver;

use crate::protocol::{
    ProgressRequest, ProgressResponse, QUALITY_DEGRADED, QUALITY_SYNTHETIC_MODEL,
};

mod protocol;

/// Talk-progress estimation from a partial transcript.
///
/// Reads `{"transcript": "..."}` on stdin and writes a single JSON
/// response on stdout.
#[derive(Parser)]
#[command(name = "talkgauge")]
struct Cli {
    /// Path to a trained regression artifact (JSON forest).
    #[arg(long)]
    model: Option<PathBuf>,

    /// Directory with pre-bundled embedding model files.
    #[arg(long)]
    bundled_models: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    match run() {
        Ok(response) => println!("{}", response.to_json()),
        Err(e) => {
            println!("{}", ProgressResponse::failure(e.to_string()).to_json());
            process::exit(1);
        }
    }
}

fn run() -> Result<ProgressResponse, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let request = read_request()?;
    let embedder = build_embedder(cli.bundled_models.as_deref())?;
    let (regressor, synthetic) = build_regressor(cli.model.as_deref())?;

    let use_case = PredictProgressUseCase::new(
        Box::new(embedder),
        Box::new(regressor),
        Box::new(PeltDetector::new()),
    );
    let report = use_case.predict(&request.transcript);

    let quality = match report.mode {
        PredictionMode::DegradedHeuristic => Some(QUALITY_DEGRADED),
        PredictionMode::Regression if synthetic => Some(QUALITY_SYNTHETIC_MODEL),
        _ => None,
    };
    Ok(ProgressResponse::success(report.prediction, quality))
}

fn read_request() -> Result<ProgressRequest, Box<dyn std::error::Error>> {
    let mut raw = String::new();
    std::io::stdin().read_to_string(&mut raw)?;
    ProgressRequest::parse(&raw)
}

fn build_embedder(
    bundled_dir: Option<&Path>,
) -> Result<OnnxSentenceEmbedder, Box<dyn std::error::Error>> {
    log::info!("Resolving embedding model: {EMBEDDING_MODEL_NAME}");
    let model_path = model_resolver::resolve(
        EMBEDDING_MODEL_NAME,
        EMBEDDING_MODEL_URL,
        bundled_dir,
        Some(Box::new(download_progress)),
    )?;
    eprintln!();

    log::info!("Resolving embedding vocab: {EMBEDDING_VOCAB_NAME}");
    let vocab_path = model_resolver::resolve(
        EMBEDDING_VOCAB_NAME,
        EMBEDDING_VOCAB_URL,
        bundled_dir,
        Some(Box::new(download_progress)),
    )?;
    eprintln!();

    Ok(OnnxSentenceEmbedder::new(&model_path, &vocab_path)?)
}

/// Loads the trained forest when the artifact exists; otherwise builds the
/// seeded synthetic substitute. A present-but-unreadable artifact is fatal.
/// The boolean reports whether the substitute is in use.
fn build_regressor(
    model: Option<&Path>,
) -> Result<(ForestRegressor, bool), Box<dyn std::error::Error>> {
    let path = match model {
        Some(p) => p.to_path_buf(),
        None => default_model_path()?,
    };

    if path.exists() {
        log::info!("Loading regression model from {}", path.display());
        Ok((ForestRegressor::load(&path)?, false))
    } else {
        log::warn!(
            "No trained model at {}, using synthetic substitute",
            path.display()
        );
        Ok((ForestRegressor::synthetic(SYNTHETIC_MODEL_SEED), true))
    }
}

fn default_model_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let exe = std::env::current_exe()?;
    let exe_dir = exe
        .parent()
        .ok_or("cannot determine executable directory")?;
    Ok(exe_dir
        .join("..")
        .join(MODEL_ARTIFACT_DIRNAME)
        .join(MODEL_ARTIFACT_FILENAME))
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading embedding model files... {pct}%");
    } else {
        eprint!("\rDownloading embedding model files... {downloaded} bytes");
    }
}
