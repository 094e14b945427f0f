//! End-to-end grading pipeline over JSON documents.
//!
//! A run loads shared components into a [`GradingContext`], processes the
//! answer key once, then grades each submission against the processed key.
//! Either side can also be exported as review tasks for human annotation.

pub mod answer_key;
mod context;
mod error;
pub mod export;
pub mod student;

pub use answer_key::{KeyReport, process_answer_key, read_answer_key};
pub use context::GradingContext;
pub use error::PipelineError;
pub use export::{ReviewTask, key_review_tasks, student_review_tasks, write_review_file};
pub use student::{SubmissionReport, process_submission, read_submission};

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Reads and parses one JSON document.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, PipelineError> {
    let raw = std::fs::read_to_string(path).map_err(|e| PipelineError::DocumentRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_str(&raw).map_err(|e| PipelineError::MalformedDocument {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Writes one document as pretty-printed JSON.
pub fn write_document<T: Serialize>(path: &Path, document: &T) -> Result<(), PipelineError> {
    let json = serde_json::to_string_pretty(document).map_err(|e| PipelineError::DocumentWrite {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;

    std::fs::write(path, json).map_err(|e| PipelineError::DocumentWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
