use thiserror::Error;

#[derive(Debug, Error)]
pub enum StructureError {
    #[error("segmentation service unreachable: {reason}")]
    ServiceUnreachable { reason: String },

    #[error("segmentation service returned an empty response")]
    EmptyResponse,

    #[error("failed to parse segmentation response: {reason}")]
    ParseFailed { reason: String },

    #[error("segmentation produced {count} components (max {max})")]
    TooManyComponents { count: usize, max: usize },
}
