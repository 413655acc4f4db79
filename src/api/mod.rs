//! Hosted model clients
//!
//! Answer generation goes through [`AnswerBackend`]; the Messages client is
//! also used by the remote extractor.

mod gemini;
mod messages;
pub mod prompt;

pub use gemini::GeminiClient;
pub use messages::{ContentPart, DocumentSource, MessagesClient};
pub use prompt::{grounding_prompt, GROUNDING_INSTRUCTION};

use crate::config::{Config, Provider};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Substituted when a successful reply carries no text
pub const NO_RESPONSE: &str = "No response received";

/// Reported when a failed reply carries no error message
pub const ANSWER_FAILED: &str = "Failed to get answer";

/// A hosted text-generation API answering single-turn prompts
#[async_trait]
pub trait AnswerBackend: Send + Sync {
    /// Short identifier for logs
    fn name(&self) -> &str;

    /// Submit one prompt and return the answer text
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Build the configured answer backend
pub fn answer_backend(config: &Config, client: reqwest::Client) -> Arc<dyn AnswerBackend> {
    match config.provider {
        Provider::Messages => Arc::new(MessagesClient::new(client, config)),
        Provider::Gemini => Arc::new(GeminiClient::new(client, config)),
    }
}
