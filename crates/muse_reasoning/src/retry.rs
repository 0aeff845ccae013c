//! Exponential backoff for model HTTP calls.
//!
//! Retries on 408, 429, 5xx and network errors. Other client errors (400, 401,
//! 403, 404) fail on the first attempt.

use anyhow::Result;
use rand::Rng;
use reqwest::{Response, StatusCode};
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            backoff_factor: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn with_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// Delay after the given 1-based failed attempt, before jitter.
    fn base_delay(&self, attempt: u32) -> Duration {
        let factor = self.backoff_factor.powi(attempt.saturating_sub(1) as i32);
        let ms = (self.initial_delay.as_millis() as f64 * factor).round() as u64;
        Duration::from_millis(ms.min(self.max_delay.as_millis() as u64))
    }
}

pub(crate) fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
}

/// Run `send` until it yields a 2xx response, a non-retryable status, or the
/// policy runs out of attempts.
pub async fn send_with_retry<F, Fut>(policy: &RetryPolicy, provider: &str, send: F) -> Result<Response>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Response>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut last_error = String::from("no attempt made");

    for attempt in 1..=attempts {
        match send().await {
            Ok(response) if response.status().is_success() => {
                if attempt > 1 {
                    tracing::info!(provider, attempt, "request succeeded after retry");
                }
                return Ok(response);
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                if !is_retryable_status(status) {
                    anyhow::bail!("{} API error ({}): {}", provider, status, body);
                }
                tracing::warn!(
                    provider,
                    %status,
                    attempt,
                    max_attempts = attempts,
                    "retryable API error: {}",
                    body.chars().take(200).collect::<String>()
                );
                last_error = format!("{} ({}): {}", provider, status, body);
            }
            Err(e) => {
                tracing::warn!(provider, attempt, max_attempts = attempts, "network error: {:#}", e);
                last_error = format!("{}: {:#}", provider, e);
            }
        }

        if attempt < attempts {
            let base = policy.base_delay(attempt);
            let jitter_ms = rand::thread_rng().gen_range(0..=base.as_millis() as u64 / 2);
            let sleep_for = base + Duration::from_millis(jitter_ms);
            tracing::debug!(provider, "retrying in {:.2}s", sleep_for.as_secs_f64());
            tokio::time::sleep(sleep_for).await;
        }
    }

    anyhow::bail!("All {} attempts failed. Last error: {}", attempts, last_error)
}
