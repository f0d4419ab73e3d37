/// MiniLM sentence embedder using ONNX Runtime.
///
/// Tokenizes each chunk with WordPiece, runs the transformer, mean-pools
/// the token embeddings under the attention mask and L2-normalizes the
/// result so downstream cosine math reduces to dot products.
use std::path::Path;
use std::sync::Mutex;

use ndarray::{Array2, ArrayView3};

use crate::embedding::domain::text_embedder::TextEmbedder;
use crate::embedding::infrastructure::wordpiece_tokenizer::WordPieceTokenizer;

pub struct OnnxSentenceEmbedder {
    session: Mutex<ort::session::Session>,
    tokenizer: WordPieceTokenizer,
}

impl OnnxSentenceEmbedder {
    pub fn new(model_path: &Path, vocab_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let intra_threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let session = ort::session::Session::builder()?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)?
            .with_inter_threads(1)?
            .with_intra_threads(intra_threads)?
            .commit_from_file(model_path)?;
        let tokenizer = WordPieceTokenizer::from_file(vocab_path)?;
        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
        })
    }

    fn embed_chunk(&self, chunk: &str) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
        let ids = self.tokenizer.encode(chunk);
        let seq_len = ids.len();
        let mask = vec![1i64; seq_len];

        let input_ids = Array2::from_shape_vec((1, seq_len), ids)?;
        let attention_mask = Array2::from_shape_vec((1, seq_len), mask.clone())?;
        let token_type_ids = Array2::<i64>::zeros((1, seq_len));

        let mut session = self
            .session
            .lock()
            .map_err(|e| format!("Lock poisoned: {e}"))?;
        let outputs = session.run(ort::inputs![
            "input_ids" => ort::value::Tensor::from_array(input_ids)?,
            "attention_mask" => ort::value::Tensor::from_array(attention_mask)?,
            "token_type_ids" => ort::value::Tensor::from_array(token_type_ids)?,
        ])?;

        let hidden = outputs[0].try_extract_array::<f32>()?;
        let hidden = hidden
            .into_dimensionality::<ndarray::Ix3>()
            .map_err(|_| "expected token embeddings of shape [1, seq, dim]")?;
        if hidden.shape()[0] != 1 || hidden.shape()[1] != seq_len {
            return Err(format!(
                "unexpected embedding output shape {:?} for sequence of {seq_len}",
                hidden.shape()
            )
            .into());
        }

        let mut embedding = mean_pool(&hidden, &mask);
        l2_normalize(&mut embedding);
        Ok(embedding)
    }
}

impl TextEmbedder for OnnxSentenceEmbedder {
    fn embed(&self, chunks: &[String]) -> Result<Vec<Vec<f32>>, Box<dyn std::error::Error>> {
        chunks.iter().map(|chunk| self.embed_chunk(chunk)).collect()
    }
}

/// Mask-weighted mean over the sequence axis of `[1, seq, dim]` hidden
/// states.
fn mean_pool(hidden: &ArrayView3<f32>, mask: &[i64]) -> Vec<f32> {
    let dim = hidden.shape()[2];
    let mut pooled = vec![0.0f32; dim];
    let mut total = 0.0f32;
    for (t, &m) in mask.iter().enumerate() {
        if m == 0 {
            continue;
        }
        total += 1.0;
        for d in 0..dim {
            pooled[d] += hidden[[0, t, d]];
        }
    }
    if total > 0.0 {
        for value in pooled.iter_mut() {
            *value /= total;
        }
    }
    pooled
}

pub fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}
