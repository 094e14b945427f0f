//! Review export in annotation-task JSONL format.
//!
//! Each processed record becomes one task: the component texts joined into a
//! single document with one labeled span per component, plus the grading
//! numbers in `meta`. Component scores ride along in the span labels so they
//! are visible during review. Span offsets are in characters.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::document::{ProcessedAnswerKey, ProcessedSubmission};

use super::error::PipelineError;

const SEPARATOR: &str = "\n\n";
const SPAN_SOURCE: &str = "rubric_grader";

/// One labeled character span over a task's text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSpan {
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub source: String,
}

/// Provenance and grading numbers attached to a task.
///
/// Score fields are present only on student tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewMeta {
    pub id: String,
    pub question: String,
    pub original_answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_similarity_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tfidf_similarity_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_structure_similarity_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_structure_components: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_grade: Option<String>,
}

/// Label palette shown by the annotation tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    pub labels: Vec<String>,
}

/// One reviewable task in annotation-tool format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewTask {
    pub text: String,
    pub spans: Vec<ReviewSpan>,
    pub meta: ReviewMeta,
    pub config: ReviewConfig,
}

struct TaskPart {
    label: String,
    content: String,
    score: Option<f32>,
    flagged: bool,
}

/// Builds one task per answer-key question, with a span per component.
pub fn key_review_tasks(key: &ProcessedAnswerKey) -> Vec<ReviewTask> {
    key.iter()
        .map(|(id, record)| {
            let parts = record
                .structure
                .iter()
                .map(|(label, component)| TaskPart {
                    label: label.to_string(),
                    content: component.content.clone(),
                    score: None,
                    flagged: record.requires_llm_evaluation.iter().any(|l| l == label),
                })
                .collect();

            let meta = ReviewMeta {
                id: id.to_string(),
                question: record.question.clone(),
                original_answer: record.answer.clone(),
                full_similarity_score: None,
                tfidf_similarity_score: None,
                mean_structure_similarity_score: None,
                total_structure_components: None,
                predicted_grade: None,
            };

            assemble(parts, meta)
        })
        .collect()
}

/// Builds one task per graded student answer, with scored spans.
pub fn student_review_tasks(submission: &ProcessedSubmission) -> Vec<ReviewTask> {
    submission
        .iter()
        .map(|(id, record)| {
            let parts = record
                .structure
                .iter()
                .enumerate()
                .map(|(index, (label, content))| TaskPart {
                    label: label.to_string(),
                    content: content.clone(),
                    score: record.structure_similarity_scores.get(index).copied(),
                    flagged: record.requires_llm_evaluation.iter().any(|l| l == label),
                })
                .collect();

            let meta = ReviewMeta {
                id: id.to_string(),
                question: format!("Student Answer for Q#{id}"),
                original_answer: record.original_answer.clone(),
                full_similarity_score: Some(record.full_similarity_score),
                tfidf_similarity_score: Some(record.tfidf_similarity_score),
                mean_structure_similarity_score: Some(record.mean_structure_similarity_score),
                total_structure_components: Some(record.total_structure_components),
                predicted_grade: Some(record.predicted_grade.clone()),
            };

            assemble(parts, meta)
        })
        .collect()
}

/// Writes tasks as JSONL, one task per line.
pub fn write_review_file(path: &Path, tasks: &[ReviewTask]) -> Result<(), PipelineError> {
    let mut out = String::new();
    for task in tasks {
        let line = serde_json::to_string(task).map_err(|e| PipelineError::DocumentWrite {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;
        out.push_str(&line);
        out.push('\n');
    }

    std::fs::write(path, out).map_err(|e| PipelineError::DocumentWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

fn assemble(parts: Vec<TaskPart>, meta: ReviewMeta) -> ReviewTask {
    let mut text = String::new();
    let mut spans = Vec::new();
    let mut labels = Vec::new();
    let mut offset = 0usize;

    for part in parts {
        let content = part.content.trim();
        if content.is_empty() {
            continue;
        }
        let label = format_label(&part.label, part.score, part.flagged);

        if !text.is_empty() {
            text.push_str(SEPARATOR);
            offset += SEPARATOR.chars().count();
        }
        let start = offset;
        let length = content.chars().count();
        text.push_str(content);
        offset += length;

        spans.push(ReviewSpan {
            start,
            end: start + length,
            label: label.clone(),
            source: SPAN_SOURCE.to_string(),
        });
        labels.push(label);
    }

    ReviewTask {
        text,
        spans,
        meta,
        config: ReviewConfig { labels },
    }
}

fn format_label(label: &str, score: Option<f32>, flagged: bool) -> String {
    match (score, flagged) {
        (Some(score), true) => format!("{label} ({score:.2}) [LLM]"),
        (Some(score), false) => format!("{label} ({score:.2}) [Cosine]"),
        (None, true) => format!("{label} [LLM]"),
        (None, false) => label.to_string(),
    }
}
