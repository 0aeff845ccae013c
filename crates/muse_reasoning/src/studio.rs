//! Four-perspective collaboration over one prompt.
//!
//! Each perspective is one model call with its own system prompt. Calls run in
//! order on the caller's task; a failed or empty reply is replaced by the
//! studio's fallback text so a cycle always yields four contributions.

use crate::api_types::Message;
use crate::llm::{CompletionParams, LlmClient};
use crate::prompts;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Perspective {
    Visionary,
    Engineer,
    Storyteller,
    Critic,
}

impl Perspective {
    /// Brainstorm order.
    pub const ALL: [Perspective; 4] = [
        Perspective::Visionary,
        Perspective::Engineer,
        Perspective::Storyteller,
        Perspective::Critic,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Perspective::Visionary => "Visionary",
            Perspective::Engineer => "Engineer",
            Perspective::Storyteller => "Storyteller",
            Perspective::Critic => "Critic",
        }
    }
}

impl fmt::Display for Perspective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub perspective: Perspective,
    pub text: String,
    /// True when `text` is the fallback rather than model output.
    pub fallback: bool,
}

pub struct Studio {
    client: Option<Arc<dyn LlmClient>>,
    params: CompletionParams,
    fallback_text: String,
}

impl Studio {
    pub fn new(client: Arc<dyn LlmClient>, params: CompletionParams, fallback_text: impl Into<String>) -> Self {
        Self {
            client: Some(client),
            params,
            fallback_text: fallback_text.into(),
        }
    }

    /// A studio without a model: every contribution is the fallback text.
    pub fn offline(fallback_text: impl Into<String>) -> Self {
        Self {
            client: None,
            params: CompletionParams::default(),
            fallback_text: fallback_text.into(),
        }
    }

    pub fn is_online(&self) -> bool {
        self.client.is_some()
    }

    fn fallback(&self, perspective: Perspective) -> Contribution {
        Contribution {
            perspective,
            text: self.fallback_text.clone(),
            fallback: true,
        }
    }

    /// One perspective's take on `prompt`.
    pub async fn contribute(&self, perspective: Perspective, prompt: &str, related: &[String]) -> Contribution {
        let Some(client) = &self.client else {
            return self.fallback(perspective);
        };

        let request = prompts::brainstorm_request(prompt, related);
        match client
            .complete(
                prompts::system_prompt(perspective),
                vec![Message::user(request)],
                self.params.clone(),
            )
            .await
        {
            Ok(resp) => {
                let text = resp.text().trim().to_string();
                if text.is_empty() {
                    tracing::warn!(%perspective, "empty model reply, using fallback");
                    return self.fallback(perspective);
                }
                tracing::debug!(%perspective, chars = text.len(), "contribution received");
                Contribution {
                    perspective,
                    text,
                    fallback: false,
                }
            }
            Err(e) => {
                tracing::warn!(%perspective, provider = client.provider_name(), "generation failed, using fallback: {:#}", e);
                self.fallback(perspective)
            }
        }
    }

    /// All four perspectives, in [`Perspective::ALL`] order.
    pub async fn brainstorm(&self, prompt: &str, related: &[String]) -> Vec<Contribution> {
        let mut contributions = Vec::with_capacity(Perspective::ALL.len());
        for perspective in Perspective::ALL {
            contributions.push(self.contribute(perspective, prompt, related).await);
        }
        contributions
    }
}

/// Final text for a cycle: the prompt as a title, then one section per contribution.
pub fn blend(prompt: &str, contributions: &[Contribution]) -> String {
    let mut text = format!("Idea: {}\n", prompt.trim());
    for c in contributions {
        text.push_str(&format!("\n[{}]\n{}\n", c.perspective, c.text.trim()));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offline_studio_falls_back_everywhere() {
        let studio = Studio::offline("quiet muse");
        assert!(!studio.is_online());
        let contributions = studio.brainstorm("a flying car", &[]).await;
        assert_eq!(contributions.len(), 4);
        for (c, p) in contributions.iter().zip(Perspective::ALL) {
            assert_eq!(c.perspective, p);
            assert_eq!(c.text, "quiet muse");
            assert!(c.fallback);
        }
    }

    #[test]
    fn test_blend_layout() {
        let contributions = vec![
            Contribution {
                perspective: Perspective::Visionary,
                text: "  Cars in the clouds.  ".into(),
                fallback: false,
            },
            Contribution {
                perspective: Perspective::Critic,
                text: "Noisy.".into(),
                fallback: false,
            },
        ];
        let text = blend("flying car ", &contributions);
        assert_eq!(
            text,
            "Idea: flying car\n\n[Visionary]\nCars in the clouds.\n\n[Critic]\nNoisy.\n"
        );
    }

    #[test]
    fn test_perspective_order_and_labels() {
        let labels: Vec<&str> = Perspective::ALL.iter().map(|p| p.label()).collect();
        assert_eq!(labels, vec!["Visionary", "Engineer", "Storyteller", "Critic"]);
        assert_eq!(Perspective::Engineer.to_string(), "Engineer");
    }
}
