//! OpenAI chat-completions provider.
//!
//! Also serves any OpenAI-compatible endpoint (DeepSeek, local gateways) by
//! swapping the base URL. The request/response helpers are shared with Ollama.

use crate::api_types::{Message, MessagesResponse, Role};
use crate::llm::{CompletionParams, LlmClient};
use crate::retry::{send_with_retry, RetryPolicy};
use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    retry: RetryPolicy,
}

impl OpenAiClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            retry,
        })
    }
}

/// Chat messages in OpenAI format, system prompt first.
pub(crate) fn build_chat_messages(system: &str, messages: Vec<Message>) -> Vec<Value> {
    let mut chat = Vec::with_capacity(messages.len() + 1);
    if !system.is_empty() {
        chat.push(json!({"role": "system", "content": system}));
    }
    for msg in messages {
        let role = match msg.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        chat.push(json!({"role": role, "content": msg.content}));
    }
    chat
}

pub(crate) fn build_chat_payload(
    model: &str,
    system: &str,
    messages: Vec<Message>,
    params: &CompletionParams,
) -> Value {
    json!({
        "model": model,
        "messages": build_chat_messages(system, messages),
        "temperature": params.temperature,
        "max_tokens": params.max_tokens,
    })
}

/// Parse a non-streaming chat-completions response.
pub(crate) fn parse_chat_response(resp_json: &Value) -> Result<MessagesResponse> {
    let choice = resp_json["choices"]
        .get(0)
        .context("Response has no choices")?;
    let finish_reason = choice["finish_reason"].as_str().map(|s| s.to_string());
    let text = choice["message"]["content"].as_str().unwrap_or_default();

    if text.is_empty() {
        return Ok(MessagesResponse {
            content: vec![],
            stop_reason: finish_reason,
        });
    }
    Ok(MessagesResponse::from_text(text, finish_reason))
}

#[async_trait::async_trait]
impl LlmClient for OpenAiClient {
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
        let api_key = &self.api_key;

        let response = send_with_retry(&self.retry, "OpenAI", || async {
            client
                .post(&url)
                .bearer_auth(api_key)
                .json(&payload)
                .send()
                .await
                .context("Failed to send request to OpenAI")
        })
        .await?;

        let resp_json: Value = response.json().await.context("Failed to decode OpenAI response")?;
        parse_chat_response(&resp_json)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_types::ContentBlock;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            initial_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(10),
            backoff_factor: 2.0,
        }
    }

    fn client_for(server: &MockServer) -> OpenAiClient {
        OpenAiClient::new(
            &server.uri(),
            "sk-test",
            "gpt-test",
            Duration::from_secs(5),
            fast_retry(),
        )
        .unwrap()
    }

    #[test]
    fn test_parse_text_response() {
        let resp = json!({
            "choices": [{
                "message": { "content": "A bicycle that folds into a backpack." },
                "finish_reason": "stop"
            }]
        });
        let result = parse_chat_response(&resp).unwrap();
        assert_eq!(
            result.content,
            vec![ContentBlock::Text { text: "A bicycle that folds into a backpack.".into() }]
        );
        assert_eq!(result.stop_reason, Some("stop".into()));
    }

    #[test]
    fn test_parse_empty_content() {
        let resp = json!({
            "choices": [{ "message": { "content": "" }, "finish_reason": "stop" }]
        });
        assert!(parse_chat_response(&resp).unwrap().content.is_empty());
    }

    #[test]
    fn test_parse_missing_choices_is_error() {
        assert!(parse_chat_response(&json!({"error": "nope"})).is_err());
    }

    #[test]
    fn test_build_messages_system_first() {
        let built = build_chat_messages(
            "You are a visionary.",
            vec![Message::user("Hi"), Message::assistant("Hello!")],
        );
        assert_eq!(built.len(), 3);
        assert_eq!(built[0]["role"], "system");
        assert_eq!(built[1]["role"], "user");
        assert_eq!(built[1]["content"], "Hi");
        assert_eq!(built[2]["role"], "assistant");
    }

    #[test]
    fn test_build_messages_skips_empty_system() {
        let built = build_chat_messages("", vec![Message::user("Hi")]);
        assert_eq!(built.len(), 1);
        assert_eq!(built[0]["role"], "user");
    }

    #[tokio::test]
    async fn test_complete_sends_auth_and_parses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "content": "Solar sails for bikes." }, "finish_reason": "stop" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resp = client_for(&server)
            .complete("sys", vec![Message::user("bikes")], CompletionParams::default())
            .await
            .unwrap();
        assert_eq!(resp.text(), "Solar sails for bikes.");
    }

    #[tokio::test]
    async fn test_complete_retries_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "content": "second time lucky" }, "finish_reason": "stop" }]
            })))
            .mount(&server)
            .await;

        let resp = client_for(&server)
            .complete("sys", vec![Message::user("x")], CompletionParams::default())
            .await
            .unwrap();
        assert_eq!(resp.text(), "second time lucky");
    }

    #[tokio::test]
    async fn test_complete_fails_fast_on_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .complete("sys", vec![Message::user("x")], CompletionParams::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("401"));
    }
}
