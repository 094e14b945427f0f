//! Student submission ingestion and grading.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::document::{
    ProcessedAnswerKey, ProcessedStudentAnswer, ProcessedSubmission, RawSubmission,
};
use crate::similarity::{clipped_cosine, mean_score, structure_scores, tfidf};
use crate::structure::SegmentationBackend;

use super::context::GradingContext;
use super::error::PipelineError;

/// Accounting for one graded submission.
#[derive(Debug, Clone, Default)]
pub struct SubmissionReport {
    /// Answer count in the raw submission.
    pub answers: usize,
    /// Question ids skipped because the key has no usable record for them.
    pub skipped_no_key: Vec<String>,
    /// Components whose cosine score was replaced by an LLM rating.
    pub llm_rated_components: usize,
}

impl SubmissionReport {
    /// Number of answers that made it through grading.
    pub fn graded(&self) -> usize {
        self.answers - self.skipped_no_key.len()
    }

    /// Returns `true` if every answer in the submission was graded.
    pub fn all_graded(&self) -> bool {
        self.skipped_no_key.is_empty()
    }
}

/// Reads a raw student submission document from disk.
pub fn read_submission(path: &Path) -> Result<RawSubmission, PipelineError> {
    super::read_document(path)
}

/// Scores every answer of a submission against the processed key.
///
/// Answers to questions the key does not cover (or covers only with a
/// defaulted record) are skipped. Empty answers flow through normally and
/// score zero everywhere.
pub async fn process_submission<B: SegmentationBackend>(
    ctx: &GradingContext<B>,
    key: &ProcessedAnswerKey,
    raw: &RawSubmission,
) -> (ProcessedSubmission, SubmissionReport) {
    let mut processed = ProcessedSubmission::with_capacity(raw.len());
    let mut report = SubmissionReport {
        answers: raw.len(),
        ..SubmissionReport::default()
    };

    for (id, answer) in raw.iter() {
        let Some(key_question) = key.get(id).filter(|k| !k.is_defaulted()) else {
            warn!(question = id, "No usable answer key record, skipping");
            report.skipped_no_key.push(id.to_string());
            continue;
        };

        let text = answer.answer.trim();
        let labels = key_question.labels();

        let student_embedding = ctx.embedder().embed(text);
        let full_similarity = clipped_cosine(&student_embedding, &key_question.embedding);
        let tfidf_similarity = tfidf::pair_similarity(text, &key_question.answer);

        let mapping = ctx
            .analyzer()
            .map_student(&key_question.question, &labels, text)
            .await;

        let mut component_scores = structure_scores(ctx.embedder(), &key_question.structure, &mapping);

        if ctx.llm_component_scoring() {
            for flagged in &key_question.requires_llm_evaluation {
                let Some(index) = labels.iter().position(|label| label == flagged) else {
                    continue;
                };
                let mapped = mapping.get(flagged).map(String::as_str).unwrap_or_default();
                if mapped.trim().is_empty() {
                    continue;
                }
                let reference = key_question
                    .structure
                    .get(flagged)
                    .map(|c| c.content.as_str())
                    .unwrap_or_default();

                match ctx
                    .analyzer()
                    .rate_component(&key_question.question, reference, mapped)
                    .await
                {
                    Ok(rating) => {
                        component_scores[index] = rating;
                        report.llm_rated_components += 1;
                    }
                    Err(e) => {
                        warn!(
                            question = id,
                            component = flagged.as_str(),
                            error = %e,
                            "Component rating failed, keeping cosine score"
                        );
                    }
                }
            }
        }

        let mean_similarity = mean_score(&component_scores);
        let predicted_grade = ctx
            .grader()
            .predict(tfidf_similarity, full_similarity, mean_similarity);

        debug!(
            question = id,
            full = full_similarity,
            tfidf = tfidf_similarity,
            mean = mean_similarity,
            grade = predicted_grade.as_str(),
            "Student answer graded"
        );

        processed.insert(
            id,
            ProcessedStudentAnswer {
                original_answer: answer.answer.clone(),
                full_similarity_score: full_similarity,
                tfidf_similarity_score: tfidf_similarity,
                structure_similarity_scores: component_scores,
                mean_structure_similarity_score: mean_similarity,
                total_structure_components: labels.len(),
                predicted_grade,
                structure: mapping,
                requires_llm_evaluation: key_question.requires_llm_evaluation.clone(),
            },
        );
    }

    info!(
        answers = report.answers,
        graded = processed.len(),
        skipped = report.skipped_no_key.len(),
        llm_rated = report.llm_rated_components,
        "Submission graded"
    );

    (processed, report)
}
