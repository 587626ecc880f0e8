//! Generation provider client and prompt templates

pub mod client;
pub mod prompts;

pub use client::GeminiClient;
pub use client::MODEL_NOT_CONFIGURED_ANSWER;

use async_trait::async_trait;

use crate::errors::Result;

/// Produces a natural-language answer from a query and a grounding context
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, query: &str, context: &str) -> Result<String>;
}
