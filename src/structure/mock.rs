use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::backend::SegmentationBackend;
use super::error::StructureError;

/// Scripted reply for [`MockSegmentation`].
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Completion text returned to the caller.
    Text(String),
    /// Simulated transport failure.
    Unreachable(String),
}

/// In-memory [`SegmentationBackend`] returning scripted replies in order.
///
/// An exhausted queue behaves like an unreachable service, which drives
/// callers onto their deterministic fallback paths.
#[derive(Debug, Default)]
pub struct MockSegmentation {
    replies: Mutex<VecDeque<MockReply>>,
    prompts: Mutex<Vec<(String, String)>>,
}

impl MockSegmentation {
    /// Creates a mock with an empty reply queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock whose every call fails as unreachable.
    pub fn unreachable() -> Self {
        Self::new()
    }

    /// Queues a completion text.
    pub fn push_text(&self, text: impl Into<String>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(MockReply::Text(text.into()));
        }
    }

    /// Queues a transport failure.
    pub fn push_unreachable(&self, reason: impl Into<String>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(MockReply::Unreachable(reason.into()));
        }
    }

    /// Number of completions requested so far.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// Recorded `(system, user)` prompt pairs in call order.
    pub fn recorded_prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SegmentationBackend for MockSegmentation {
    async fn complete(&self, system: &str, user: &str) -> Result<String, StructureError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push((system.to_string(), user.to_string()));
        }

        let reply = self
            .replies
            .lock()
            .map_err(|_| StructureError::ServiceUnreachable {
                reason: "mock lock poisoned".to_string(),
            })?
            .pop_front();

        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Unreachable(reason)) => {
                Err(StructureError::ServiceUnreachable { reason })
            }
            None => Err(StructureError::ServiceUnreachable {
                reason: "mock reply queue exhausted".to_string(),
            }),
        }
    }
}
