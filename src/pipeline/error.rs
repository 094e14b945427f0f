use std::path::PathBuf;

use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::grading::GradingError;
use crate::structure::StructureError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read document at {path}: {source}")]
    DocumentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed document at {path}: {reason}")]
    MalformedDocument { path: PathBuf, reason: String },

    #[error("failed to write document at {path}: {source}")]
    DocumentWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("structure error: {0}")]
    Structure(#[from] StructureError),

    #[error("grading error: {0}")]
    Grading(#[from] GradingError),
}
