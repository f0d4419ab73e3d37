/// Maps text chunks to fixed-width embedding vectors, one per chunk.
pub trait TextEmbedder: Send {
    fn embed(&self, chunks: &[String]) -> Result<Vec<Vec<f32>>, Box<dyn std::error::Error>>;
}
