pub mod onnx_sentence_embedder;
pub mod wordpiece_tokenizer;
