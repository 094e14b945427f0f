//! Answer structure analysis through an LLM segmentation backend.
//!
//! The analyzer decomposes reference answers into labeled components, maps
//! student answers onto those labels, and rates individual components. Every
//! operation degrades rather than fails: transport errors retry with backoff,
//! malformed replies retry with a corrective prompt, and exhausted attempts
//! land on the deterministic fallback in [`fallback`].

pub mod backend;
mod error;
pub mod fallback;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod parse;
pub mod prompt;

pub use backend::{GenaiBackend, SegmentationBackend};
pub use error::StructureError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockReply, MockSegmentation};

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::Config;
use crate::document::StructureMapping;

use self::parse::Breakdown;

/// Pause between attempts after a transport failure.
const RETRY_BACKOFF: Duration = Duration::from_millis(750);

/// Decomposed reference answer plus how it was obtained.
#[derive(Debug, Clone)]
pub struct ReferenceBreakdown {
    pub components: StructureMapping,
    pub llm_evaluated: Vec<String>,
    pub via_fallback: bool,
}

/// Drives decomposition, mapping, and rating against a segmentation backend.
#[derive(Debug)]
pub struct StructureAnalyzer<B> {
    backend: B,
    max_components: usize,
    min_content_len: usize,
    max_prompt_chars: usize,
    retries: usize,
    force_fallback: bool,
}

impl<B: SegmentationBackend> StructureAnalyzer<B> {
    pub fn from_config(backend: B, config: &Config) -> Self {
        Self {
            backend,
            max_components: config.max_components,
            min_content_len: config.min_content_len,
            max_prompt_chars: config.max_prompt_chars,
            retries: config.segmentation_retries,
            force_fallback: config.use_structure_fallback,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Decomposes a reference answer into labeled components.
    ///
    /// Answers below the content-length threshold skip the backend entirely.
    /// Never fails; exhausted attempts produce a deterministic fallback
    /// decomposition with `via_fallback` set.
    pub async fn decompose_reference(&self, question: &str, answer: &str) -> ReferenceBreakdown {
        let trimmed = answer.trim();
        if self.force_fallback || trimmed.chars().count() < self.min_content_len {
            return self.fallback_breakdown(trimmed);
        }

        let mut corrective = false;
        for attempt in 0..=self.retries {
            let (system, mut user) = prompt::build_breakdown_prompt(
                question,
                trimmed,
                self.max_components,
                self.max_prompt_chars,
            );
            if corrective {
                user.push_str(prompt::CORRECTIVE_SUFFIX);
            }

            match self.backend.complete(&system, &user).await {
                Ok(reply) => match parse::parse_breakdown(&reply, self.max_components) {
                    Ok(Breakdown {
                        components,
                        llm_evaluated,
                    }) => {
                        debug!(components = components.len(), attempt, "Reference decomposed");
                        return ReferenceBreakdown {
                            components,
                            llm_evaluated,
                            via_fallback: false,
                        };
                    }
                    Err(e) => {
                        warn!(error = %e, attempt, "Decomposition reply rejected");
                        corrective = true;
                    }
                },
                Err(e @ StructureError::ServiceUnreachable { .. }) => {
                    warn!(error = %e, attempt, "Segmentation request failed");
                    if attempt < self.retries {
                        tokio::time::sleep(RETRY_BACKOFF).await;
                    }
                }
                Err(e) => {
                    warn!(error = %e, attempt, "Segmentation request failed");
                    corrective = true;
                }
            }
        }

        warn!("Falling back to deterministic decomposition");
        self.fallback_breakdown(trimmed)
    }

    /// Maps a student answer onto the key's component labels.
    ///
    /// The result always carries exactly `labels` in key order. Empty answers
    /// map every label to an empty string without calling the backend. Never
    /// fails; exhausted attempts produce a positional fallback mapping.
    pub async fn map_student(
        &self,
        question: &str,
        labels: &[String],
        answer: &str,
    ) -> StructureMapping {
        if labels.is_empty() {
            return StructureMapping::new();
        }

        let trimmed = answer.trim();
        if trimmed.is_empty() {
            return labels
                .iter()
                .map(|label| (label.clone(), String::new()))
                .collect();
        }
        if self.force_fallback {
            return fallback::fallback_mapping(trimmed, labels, self.min_content_len);
        }

        let mut corrective = false;
        for attempt in 0..=self.retries {
            let (system, mut user) =
                prompt::build_mapping_prompt(question, labels, trimmed, self.max_prompt_chars);
            if corrective {
                user.push_str(prompt::CORRECTIVE_SUFFIX);
            }

            match self.backend.complete(&system, &user).await {
                Ok(reply) => match parse::parse_mapping(&reply, labels) {
                    Ok(mapping) => {
                        debug!(labels = labels.len(), attempt, "Student answer mapped");
                        return mapping;
                    }
                    Err(e) => {
                        warn!(error = %e, attempt, "Mapping reply rejected");
                        corrective = true;
                    }
                },
                Err(e @ StructureError::ServiceUnreachable { .. }) => {
                    warn!(error = %e, attempt, "Segmentation request failed");
                    if attempt < self.retries {
                        tokio::time::sleep(RETRY_BACKOFF).await;
                    }
                }
                Err(e) => {
                    warn!(error = %e, attempt, "Segmentation request failed");
                    corrective = true;
                }
            }
        }

        warn!("Falling back to positional mapping");
        fallback::fallback_mapping(trimmed, labels, self.min_content_len)
    }

    /// Rates how well mapped student text covers one reference component.
    ///
    /// Returns a score in `[0, 1]`. Unlike decomposition and mapping this has
    /// no deterministic fallback, so the caller decides what a failure means.
    pub async fn rate_component(
        &self,
        question: &str,
        reference: &str,
        student: &str,
    ) -> Result<f32, StructureError> {
        if self.force_fallback {
            return Err(StructureError::ServiceUnreachable {
                reason: "segmentation disabled, fallback forced".to_string(),
            });
        }

        let mut corrective = false;
        let mut last_error = None;
        for attempt in 0..=self.retries {
            let (system, mut user) =
                prompt::build_rating_prompt(question, reference, student, self.max_prompt_chars);
            if corrective {
                user.push_str(prompt::CORRECTIVE_SUFFIX);
            }

            match self.backend.complete(&system, &user).await {
                Ok(reply) => match parse::parse_rating(&reply) {
                    Ok(score) => return Ok(score),
                    Err(e) => {
                        warn!(error = %e, attempt, "Rating reply rejected");
                        corrective = true;
                        last_error = Some(e);
                    }
                },
                Err(e @ StructureError::ServiceUnreachable { .. }) => {
                    warn!(error = %e, attempt, "Rating request failed");
                    if attempt < self.retries {
                        tokio::time::sleep(RETRY_BACKOFF).await;
                    }
                    last_error = Some(e);
                }
                Err(e) => {
                    warn!(error = %e, attempt, "Rating request failed");
                    corrective = true;
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(StructureError::EmptyResponse))
    }

    fn fallback_breakdown(&self, answer: &str) -> ReferenceBreakdown {
        ReferenceBreakdown {
            components: fallback::fallback_components(
                answer,
                self.max_components,
                self.min_content_len,
            ),
            llm_evaluated: Vec::new(),
            via_fallback: true,
        }
    }
}
