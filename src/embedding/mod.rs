//! Embedding + model utilities.
//!
//! [`encoder`] turns answer text into dense vectors for similarity scoring.

/// BERT encoder wrapper (mean pooling).
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
/// Answer embedder and its configuration.
pub mod encoder;
mod error;
/// Tokenizer loading helpers.
pub mod utils;

pub use encoder::{AnswerEmbedder, EMBEDDER_DIM, EMBEDDER_MAX_SEQ_LEN, EmbedderConfig};
pub use error::EmbeddingError;
