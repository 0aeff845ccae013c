//! OpenAI `/audio/speech` TTS provider.

use crate::tts::{AudioFormat, TextToSpeech};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone)]
pub struct OpenAiSpeech {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    voice: String,
}

impl OpenAiSpeech {
    pub fn new(base_url: &str, api_key: &str, model: &str, voice: &str) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(60)).build()?,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            voice: voice.to_string(),
        })
    }
}

#[async_trait]
impl TextToSpeech for OpenAiSpeech {
    #[tracing::instrument(skip(self, text), fields(voice = %self.voice, chars = text.len()))]
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let url = format!("{}/audio/speech", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "input": text,
                "voice": self.voice,
                "response_format": AudioFormat::Mp3.extension(),
            }))
            .send()
            .await
            .context("Failed to send request to OpenAI speech")?;

        if !response.status().is_success() {
            let status = response.status();
            let err_text = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI speech error {}: {}", status, err_text);
        }

        let bytes = response.bytes().await.context("Failed to read speech audio")?;
        Ok(bytes.to_vec())
    }

    fn format(&self) -> AudioFormat {
        AudioFormat::Mp3
    }

    fn voice_id(&self) -> &str {
        &self.voice
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_synthesize_returns_body_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/speech"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "tts-1",
                "input": "hello",
                "voice": "alloy",
                "response_format": "mp3"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x49u8, 0x44, 0x33]))
            .expect(1)
            .mount(&server)
            .await;

        let tts = OpenAiSpeech::new(&server.uri(), "sk-test", "tts-1", "alloy").unwrap();
        let audio = tts.synthesize("hello").await.unwrap();
        assert_eq!(audio, vec![0x49u8, 0x44, 0x33]);
        assert_eq!(tts.format(), AudioFormat::Mp3);
    }

    #[tokio::test]
    async fn test_error_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let tts = OpenAiSpeech::new(&server.uri(), "k", "tts-1", "alloy").unwrap();
        let err = tts.synthesize("hello").await.unwrap_err();
        assert!(err.to_string().contains("429"));
    }
}
