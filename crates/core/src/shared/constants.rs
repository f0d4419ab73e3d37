pub const EMBEDDING_MODEL_NAME: &str = "all-MiniLM-L6-v2.onnx";
pub const EMBEDDING_MODEL_URL: &str =
    "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main/onnx/model.onnx";

pub const EMBEDDING_VOCAB_NAME: &str = "all-MiniLM-L6-v2-vocab.txt";
pub const EMBEDDING_VOCAB_URL: &str =
    "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main/vocab.txt";

/// Normalization divisor for chunk counts (~40 sentences in a full talk).
pub const AVG_SPEECH_LEN: f64 = 40.0;

pub const PELT_PENALTY: f64 = 6.0;

pub const MIN_CHUNKS_FOR_PIPELINE: usize = 2;
pub const MIN_CHUNKS_FOR_CHANGE_POINTS: usize = 3;

pub const SHORT_TRANSCRIPT_PREDICTION: f64 = 15.0;

pub const HEURISTIC_SHORT_WORDS: usize = 50;
pub const HEURISTIC_MEDIUM_WORDS: usize = 100;
pub const HEURISTIC_SHORT_PREDICTION: f64 = 25.0;
pub const HEURISTIC_MEDIUM_PREDICTION: f64 = 50.0;
pub const HEURISTIC_LONG_PREDICTION: f64 = 75.0;

pub const SYNTHETIC_MODEL_SEED: u64 = 42;

pub const MODEL_ARTIFACT_DIRNAME: &str = "model";
pub const MODEL_ARTIFACT_FILENAME: &str = "progress_forest.json";
