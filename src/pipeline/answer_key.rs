//! Answer key ingestion and processing.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::document::{KeyComponent, OrderedMap, ProcessedAnswerKey, ProcessedKeyQuestion, RawAnswerKey};
use crate::structure::SegmentationBackend;

use super::context::GradingContext;
use super::error::PipelineError;

/// Accounting for one processed answer key.
#[derive(Debug, Clone, Default)]
pub struct KeyReport {
    /// Question count in the raw key.
    pub questions: usize,
    /// Question ids whose reference answer was empty, carried as defaulted
    /// records with no structure.
    pub defaulted: Vec<String>,
    /// Question ids decomposed by the deterministic fallback.
    pub fallback_decompositions: Vec<String>,
}

impl KeyReport {
    /// Number of questions that got a real embedding and structure.
    pub fn processed(&self) -> usize {
        self.questions - self.defaulted.len()
    }

    /// Returns `true` if no question had to be carried as a defaulted record.
    pub fn all_processed(&self) -> bool {
        self.defaulted.is_empty()
    }
}

/// Reads a raw answer key document from disk.
pub fn read_answer_key(path: &Path) -> Result<RawAnswerKey, PipelineError> {
    super::read_document(path)
}

/// Embeds and decomposes every question of a raw answer key.
///
/// Questions with empty reference answers become defaulted records (zero
/// embedding, no structure) rather than failing the run.
pub async fn process_answer_key<B: SegmentationBackend>(
    ctx: &GradingContext<B>,
    raw: &RawAnswerKey,
) -> (ProcessedAnswerKey, KeyReport) {
    let mut processed = ProcessedAnswerKey::with_capacity(raw.len());
    let mut report = KeyReport {
        questions: raw.len(),
        ..KeyReport::default()
    };

    for (id, question) in raw.iter() {
        let answer = question.answer.trim();

        if answer.is_empty() {
            warn!(question = id, "Empty reference answer, writing defaulted record");
            report.defaulted.push(id.to_string());
            processed.insert(
                id,
                ProcessedKeyQuestion {
                    question: question.question.clone(),
                    answer: question.answer.clone(),
                    embedding: vec![0.0; ctx.embedder().embedding_dim()],
                    structure: OrderedMap::new(),
                    requires_llm_evaluation: Vec::new(),
                },
            );
            continue;
        }

        let embedding = ctx.embedder().embed(answer);
        let breakdown = ctx
            .analyzer()
            .decompose_reference(&question.question, answer)
            .await;
        if breakdown.via_fallback {
            report.fallback_decompositions.push(id.to_string());
        }

        let structure: OrderedMap<KeyComponent> = breakdown
            .components
            .into_iter()
            .map(|(label, content)| {
                let embedding = ctx.embedder().embed(&content);
                (label, KeyComponent { content, embedding })
            })
            .collect();

        debug!(
            question = id,
            components = structure.len(),
            via_fallback = breakdown.via_fallback,
            "Answer key question processed"
        );

        processed.insert(
            id,
            ProcessedKeyQuestion {
                question: question.question.clone(),
                answer: question.answer.clone(),
                embedding,
                structure,
                requires_llm_evaluation: breakdown.llm_evaluated,
            },
        );
    }

    info!(
        questions = report.questions,
        defaulted = report.defaulted.len(),
        fallback_decompositions = report.fallback_decompositions.len(),
        "Answer key processed"
    );

    (processed, report)
}
