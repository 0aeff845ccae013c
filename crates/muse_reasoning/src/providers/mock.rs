//! Mock LLM provider: deterministic responses for offline runs and tests.

use crate::api_types::{Message, MessagesResponse};
use crate::llm::{CompletionParams, LlmClient};
use anyhow::Result;

#[derive(Debug, Clone)]
pub struct MockProvider {
    model: String,
}

impl MockProvider {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for MockProvider {
    async fn complete(
        &self,
        system: &str,
        messages: Vec<Message>,
        _params: CompletionParams,
    ) -> Result<MessagesResponse> {
        let persona = system.lines().next().unwrap_or_default();
        let topic = messages
            .last()
            .map(|m| m.content.lines().next().unwrap_or_default().to_string())
            .unwrap_or_default();
        Ok(MessagesResponse::from_text(
            format!("(Mock {}) {} | {}", self.model, persona, topic),
            Some("end_turn".to_string()),
        ))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
