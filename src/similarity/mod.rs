//! Similarity scoring between student answers and answer-key material.
//!
//! All scores land in `[0, 1]`: cosine values below zero are clipped so the
//! grade features stay on a shared scale.

/// Term-frequency similarity over a document pair.
pub mod tfidf;


use crate::document::{KeyComponent, OrderedMap, StructureMapping};
use crate::embedding::AnswerEmbedder;

/// Cosine similarity clipped to `[0, 1]`.
///
/// Mismatched lengths, empty vectors, and zero-norm vectors all score 0.
#[inline]
pub fn clipped_cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a_sq, norm_b_sq) =
        a.iter()
            .zip(b.iter())
            .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (&av, &bv)| {
                (dot + av * bv, na + av * av, nb + bv * bv)
            });

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let score = dot / (norm_a * norm_b);
    if !score.is_finite() {
        return 0.0;
    }

    score.clamp(0.0, 1.0)
}

/// Per-component cosine scores between mapped student text and key components.
///
/// Scores follow the key structure's label order. Labels the student mapping
/// misses (or maps to empty text) score 0 without an embedding call.
pub fn structure_scores(
    embedder: &AnswerEmbedder,
    key_structure: &OrderedMap<KeyComponent>,
    mapping: &StructureMapping,
) -> Vec<f32> {
    key_structure
        .iter()
        .map(|(label, component)| {
            let mapped = mapping.get(label).map(String::as_str).unwrap_or("");
            if mapped.trim().is_empty() {
                return 0.0;
            }

            let student_embedding = embedder.embed(mapped);
            clipped_cosine(&component.embedding, &student_embedding)
        })
        .collect()
}

/// Arithmetic mean of a score list (empty list scores 0).
pub fn mean_score(scores: &[f32]) -> f32 {
    if scores.is_empty() {
        return 0.0;
    }

    scores.iter().sum::<f32>() / scores.len() as f32
}
