//! Ollama LLM Provider
//!
//! Ollama exposes an OpenAI-compatible API at localhost:11434/v1,
//! so we reuse the OpenAI payload and response handling. No API key.

use super::openai::{build_chat_payload, parse_chat_response};
use crate::api_types::{Message, MessagesResponse};
use crate::llm::{CompletionParams, LlmClient};
use crate::retry::{send_with_retry, RetryPolicy};
use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";

#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    retry: RetryPolicy,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str, timeout: Duration, retry: RetryPolicy) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            retry,
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for OllamaClient {
    #[tracing::instrument(skip(self, system, messages, params), fields(model = %self.model))]
    async fn complete(
        &self,
        system: &str,
        messages: Vec<Message>,
        params: CompletionParams,
    ) -> Result<MessagesResponse> {
        let payload = build_chat_payload(&self.model, system, messages, &params);
        let url = format!("{}/chat/completions", self.base_url);
        let client = &self.client;

        let response = send_with_retry(&self.retry, "Ollama", || async {
            client
                .post(&url)
                .json(&payload)
                .send()
                .await
                .context("Failed to send request to Ollama")
        })
        .await?;

        let resp_json: Value = response.json().await.context("Failed to decode Ollama response")?;
        parse_chat_response(&resp_json)
    }

    fn provider_name(&self) -> &'static str {
        "ollama"
    }
}
