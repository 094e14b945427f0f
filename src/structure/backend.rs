use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatRequest};
use tracing::debug;

use super::error::StructureError;

#[async_trait]
/// Chat transport used by [`StructureAnalyzer`](super::StructureAnalyzer).
pub trait SegmentationBackend: Send + Sync {
    /// Sends a system + user prompt pair and returns the raw completion text.
    async fn complete(&self, system: &str, user: &str) -> Result<String, StructureError>;
}

/// Provider-backed [`SegmentationBackend`] using the `genai` multi-provider client.
///
/// Provider credentials are resolved from the environment by the client.
pub struct GenaiBackend {
    client: Client,
    model: String,
}

impl GenaiBackend {
    /// Creates a backend routing completions to `model`.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
        }
    }

    /// Model identifier completions are routed to.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl std::fmt::Debug for GenaiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiBackend")
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl SegmentationBackend for GenaiBackend {
    async fn complete(&self, system: &str, user: &str) -> Result<String, StructureError> {
        let request = ChatRequest::new(vec![ChatMessage::system(system), ChatMessage::user(user)]);

        let response = self
            .client
            .exec_chat(&self.model, request, None)
            .await
            .map_err(|e| StructureError::ServiceUnreachable {
                reason: e.to_string(),
            })?;

        let text = response.first_text().unwrap_or_default().to_string();
        if text.trim().is_empty() {
            return Err(StructureError::EmptyResponse);
        }

        debug!(
            model = %self.model,
            response_len = text.len(),
            "Segmentation completion received"
        );

        Ok(text)
    }
}
