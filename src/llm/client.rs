//! Gemini generation API client

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;
use tracing::warn;

use crate::config::LlmConfig;
use crate::errors::NewsRagError;
use crate::errors::Result;
use crate::llm::prompts;
use crate::llm::Generator;

/// Fixed degraded answer returned when no model credential is configured,
/// so the response path never blocks on missing configuration
pub const MODEL_NOT_CONFIGURED_ANSWER: &str =
    "Sorry — the LLM model is not configured on this machine.";

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Client for the Gemini generateContent REST API.
///
/// Credential-less construction is allowed; `generate` then soft-degrades
/// to a fixed answer instead of failing.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(ToString::to_string);

        if api_key.is_none() {
            warn!("Gemini API key not configured; generation will return a fallback answer");
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| NewsRagError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: GEMINI_API_BASE.to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

/// Pull the answer text out of a generateContent response body.
///
/// Provider response shapes drift between API revisions; anything
/// unexpected is coerced to a string instead of raised.
fn extract_answer(body: &serde_json::Value) -> String {
    body.pointer("/candidates/0/content/parts/0/text")
        .and_then(serde_json::Value::as_str)
        .map_or_else(|| body.to_string(), ToString::to_string)
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate(&self, query: &str, context: &str) -> Result<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(MODEL_NOT_CONFIGURED_ANSWER.to_string());
        };

        let prompt = prompts::rag_answer_prompt(query, context);
        let url = format!(
            "{}/models/{}:generateContent?key={api_key}",
            self.base_url, self.model
        );
        debug!("Calling Gemini generateContent API: model={}", self.model);

        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| NewsRagError::Generation(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(NewsRagError::Generation(format!(
                "Gemini API error ({status}): {error_text}"
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| NewsRagError::Generation(format!("Failed to parse response: {e}")))?;

        Ok(extract_answer(&body))
    }
}
