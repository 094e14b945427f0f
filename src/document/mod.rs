//! Wire types for the grading boundary.
//!
//! Raw documents arrive from the ingestion layer (one JSON object per exam or
//! submission, keyed by question id); processed documents go back out with
//! embeddings, structure, and scores attached. Key order is significant in
//! every map here, so all of them use [`OrderedMap`].

pub mod map;

#[cfg(test)]
mod tests;

pub use map::OrderedMap;

use serde::{Deserialize, Serialize};

/// Raw answer key: question id to question/reference-answer pair.
pub type RawAnswerKey = OrderedMap<RawKeyQuestion>;

/// Raw student submission: question id to answer text.
pub type RawSubmission = OrderedMap<RawStudentAnswer>;

/// Processed answer key: question id to embedded, decomposed record.
pub type ProcessedAnswerKey = OrderedMap<ProcessedKeyQuestion>;

/// Processed submission: question id to graded record.
pub type ProcessedSubmission = OrderedMap<ProcessedStudentAnswer>;

/// Student content mapped onto the key's component labels, in key order.
pub type StructureMapping = OrderedMap<String>;

/// One question in a raw answer key document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawKeyQuestion {
    /// Question text as posed to students.
    pub question: String,
    /// Instructor-authored reference answer.
    pub answer: String,
}

/// One question in a raw student submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawStudentAnswer {
    /// Student answer text (may be empty).
    pub answer: String,
}

/// A named semantic component of a reference answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyComponent {
    /// Content span attributed to this component.
    pub content: String,
    /// Embedding of the content span.
    pub embedding: Vec<f32>,
}

/// Fully processed reference answer for one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedKeyQuestion {
    /// Question text, carried through from the raw key.
    pub question: String,
    /// Reference answer text, carried through from the raw key.
    pub answer: String,
    /// Embedding of the full reference answer.
    pub embedding: Vec<f32>,
    /// Ordered structure components with their embeddings.
    pub structure: OrderedMap<KeyComponent>,
    /// Labels whose correctness is judged by LLM rating rather than cosine.
    #[serde(default)]
    pub requires_llm_evaluation: Vec<String>,
}

impl ProcessedKeyQuestion {
    /// Component labels in structure order.
    pub fn labels(&self) -> Vec<String> {
        self.structure.keys().map(str::to_string).collect()
    }

    /// `true` if this record was defaulted (empty reference answer).
    pub fn is_defaulted(&self) -> bool {
        self.structure.is_empty()
    }
}

/// Fully graded student answer for one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedStudentAnswer {
    /// Student answer text as submitted.
    pub original_answer: String,
    /// Cosine similarity between full-answer embeddings, in `[0, 1]`.
    pub full_similarity_score: f32,
    /// TF-IDF cosine similarity between full texts, in `[0, 1]`.
    pub tfidf_similarity_score: f32,
    /// Per-component similarity, aligned with the key's structure order.
    pub structure_similarity_scores: Vec<f32>,
    /// Arithmetic mean of `structure_similarity_scores` (0.0 when empty).
    pub mean_structure_similarity_score: f32,
    /// Number of key structure components this answer was scored against.
    pub total_structure_components: usize,
    /// Grade label emitted by the classifier.
    pub predicted_grade: String,
    /// Student content mapped onto the key's labels, in key order.
    pub structure: StructureMapping,
    /// Flagged labels carried through from the processed key.
    #[serde(default)]
    pub requires_llm_evaluation: Vec<String>,
}
