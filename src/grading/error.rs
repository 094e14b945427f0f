use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GradingError {
    #[error("grade model artifact not found at path: {path}")]
    ArtifactNotFound { path: PathBuf },

    #[error("failed to read grade model artifact at {path}: {source}")]
    ArtifactReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("grade model artifact is malformed: {reason}")]
    ArtifactMalformed { reason: String },

    #[error("unsupported grading algorithm: {algorithm}")]
    UnsupportedAlgorithm { algorithm: String },

    #[error("invalid grade model: {reason}")]
    InvalidModel { reason: String },
}
