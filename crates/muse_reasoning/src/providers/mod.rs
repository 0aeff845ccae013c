pub mod anthropic;
pub mod mock;
pub mod ollama;
pub mod openai;

use crate::llm::LlmClient;
use crate::retry::RetryPolicy;
use anyhow::{Context, Result};
use muse_core::config::LlmConfig;
use std::sync::Arc;
use std::time::Duration;

const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com/v1";

/// Build the client named by `config.provider`.
///
/// Fails for an unknown provider or a missing API key; callers treat that as
/// "generation unavailable".
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>> {
    let timeout = Duration::from_secs(config.timeout_secs.max(1));
    let retry = RetryPolicy::with_attempts(config.max_retries);
    let base_url = |env_name: &str, default: &str| -> String {
        config
            .base_url
            .clone()
            .or_else(|| std::env::var(env_name).ok())
            .unwrap_or_else(|| default.to_string())
    };

    let client: Arc<dyn LlmClient> = match config.provider.to_ascii_lowercase().as_str() {
        "openai" => Arc::new(openai::OpenAiClient::new(
            &base_url("OPENAI_BASE_URL", openai::DEFAULT_BASE_URL),
            &api_key("OPENAI_API_KEY")?,
            &config.model,
            timeout,
            retry,
        )?),
        "deepseek" => Arc::new(openai::OpenAiClient::new(
            &base_url("DEEPSEEK_BASE_URL", DEEPSEEK_BASE_URL),
            &api_key("DEEPSEEK_API_KEY")?,
            &config.model,
            timeout,
            retry,
        )?),
        "ollama" => Arc::new(ollama::OllamaClient::new(
            &base_url("OLLAMA_BASE_URL", ollama::DEFAULT_BASE_URL),
            &config.model,
            timeout,
            retry,
        )?),
        "anthropic" => Arc::new(anthropic::AnthropicClient::new(
            &base_url("ANTHROPIC_BASE_URL", anthropic::DEFAULT_BASE_URL),
            &api_key("ANTHROPIC_API_KEY")?,
            &config.model,
            timeout,
            retry,
        )?),
        "mock" => Arc::new(mock::MockProvider::new(&config.model)),
        other => anyhow::bail!(
            "Unknown LLM provider '{}' (expected openai, deepseek, ollama, anthropic or mock)",
            other
        ),
    };

    tracing::info!(provider = client.provider_name(), model = %config.model, "LLM client ready");
    Ok(client)
}

fn api_key(var: &str) -> Result<String> {
    std::env::var(var)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .with_context(|| format!("{} is not set", var))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: &str) -> LlmConfig {
        LlmConfig {
            provider: provider.to_string(),
            model: "m".to_string(),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn test_mock_provider_builds() {
        let client = create_client(&config("mock")).unwrap();
        assert_eq!(client.provider_name(), "mock");
    }

    #[test]
    fn test_provider_name_case_insensitive() {
        let client = create_client(&config("MOCK")).unwrap();
        assert_eq!(client.provider_name(), "mock");
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let mut cfg = config("ollama");
        cfg.base_url = Some("http://127.0.0.1:9/v1".to_string());
        let client = create_client(&cfg).unwrap();
        assert_eq!(client.provider_name(), "ollama");
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let err = create_client(&config("carrier-pigeon")).err().unwrap();
        assert!(err.to_string().contains("carrier-pigeon"));
    }

    #[test]
    fn test_missing_key_reported() {
        let err = api_key("MUSE_TEST_SURELY_UNSET_KEY").unwrap_err();
        assert!(err.to_string().contains("MUSE_TEST_SURELY_UNSET_KEY"));
    }
}
