//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary values from these rather than repeating literals,
//! so a single override keeps the embedder, the pipelines, and the documents in
//! agreement.

/// Default embedding dimension (BERT-base hidden size).
pub const DEFAULT_EMBEDDING_DIM: usize = 768;

/// Default maximum token count per embedded text.
pub const DEFAULT_MAX_SEQ_LEN: usize = 512;

/// Default cap on characters sent to the segmentation service per prompt.
pub const DEFAULT_MAX_PROMPT_CHARS: usize = 6000;

/// Default upper bound on structure components per answer.
pub const DEFAULT_MAX_COMPONENTS: usize = 10;

/// Answers shorter than this (in characters, trimmed) skip the segmentation
/// service and decompose via the deterministic fallback.
pub const DEFAULT_MIN_CONTENT_LEN: usize = 20;

/// Default number of segmentation retries after the first attempt.
pub const DEFAULT_SEGMENTATION_RETRIES: usize = 2;

/// Default chat model used for structure segmentation.
pub const DEFAULT_SEGMENTATION_MODEL: &str = "gemma-3-27b-it";

/// Default location of the grade classifier artifact.
pub const DEFAULT_GRADE_MODEL_PATH: &str = "./models/grade_model.json";

/// Default max entries in the embedding memo cache.
pub const DEFAULT_EMBED_CACHE_CAPACITY: u64 = 4096;
