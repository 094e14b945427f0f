//! Rubric library crate (used by the grading binary and integration tests).
//!
//! # Public API Surface
//!
//! This crate exposes the grading core end to end. The exports are organized
//! by module:
//!
//! ## Core Types (Stable)
//! - [`Config`], [`ConfigError`] - Run configuration
//! - [`OrderedMap`] - Insertion-ordered JSON object used by every document
//! - Raw and processed document types for answer keys and submissions
//!
//! ## Embedding & Similarity
//! - [`AnswerEmbedder`], [`EmbedderConfig`] - BERT sentence embeddings
//! - [`clipped_cosine`], [`structure_scores`] - Similarity scoring
//! - TF-IDF lexical similarity in [`similarity::tfidf`]
//!
//! ## Structure Analysis
//! - [`StructureAnalyzer`] - Reference decomposition and student mapping
//! - [`SegmentationBackend`], [`GenaiBackend`] - LLM transport seam
//!
//! ## Grading & Pipeline
//! - [`GradeModel`] - k-NN grade prediction over similarity features
//! - [`GradingContext`] plus the per-document pipeline operations in
//!   [`pipeline`]
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod document;
pub mod embedding;
pub mod grading;
pub mod hashing;
pub mod pipeline;
pub mod similarity;
pub mod structure;

pub use config::{Config, ConfigError};
pub use document::{
    KeyComponent, OrderedMap, ProcessedAnswerKey, ProcessedKeyQuestion, ProcessedStudentAnswer,
    ProcessedSubmission, RawAnswerKey, RawKeyQuestion, RawStudentAnswer, RawSubmission,
    StructureMapping,
};
pub use embedding::{
    AnswerEmbedder, EMBEDDER_DIM, EMBEDDER_MAX_SEQ_LEN, EmbedderConfig, EmbeddingError,
};
pub use grading::{
    FEATURE_FULL, FEATURE_MEAN, FEATURE_TF_IDF, GradeModel, GradingError, TrainingPoint,
};
pub use hashing::hash_text;
pub use pipeline::{
    GradingContext, KeyReport, PipelineError, SubmissionReport, process_answer_key,
    process_submission, read_answer_key, read_submission,
};
pub use similarity::{clipped_cosine, mean_score, structure_scores};
pub use structure::{
    GenaiBackend, ReferenceBreakdown, SegmentationBackend, StructureAnalyzer, StructureError,
};
#[cfg(any(test, feature = "mock"))]
pub use structure::{MockReply, MockSegmentation};
