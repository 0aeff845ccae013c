pub mod api_types;
pub mod llm;
pub mod prompts;
pub mod providers;
pub mod retry;
pub mod studio;

pub use llm::{CompletionParams, LlmClient};
pub use providers::create_client;
pub use studio::{blend, Contribution, Perspective, Studio};
