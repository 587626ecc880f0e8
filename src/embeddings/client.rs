//! Jina embeddings API client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::config::EmbeddingsConfig;
use crate::embeddings::Embedder;
use crate::errors::NewsRagError;
use crate::errors::Result;

/// Client for the Jina embeddings REST API
pub struct JinaClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl JinaClient {
    /// Create a new embedding client.
    ///
    /// # Errors
    /// - Missing API key (required provider credential, fatal at boot)
    /// - HTTP client build errors (invalid configuration)
    pub fn new(config: &EmbeddingsConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| NewsRagError::Config("JINA_API_KEY is not set".to_string()))?
            .to_string();

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NewsRagError::Http(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }
}

#[derive(Serialize)]
struct JinaRequest<'a> {
    model: &'a str,
    task: &'a str,
    input: Vec<JinaInput<'a>>,
}

#[derive(Serialize)]
struct JinaInput<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct JinaResponse {
    #[serde(default)]
    data: Vec<JinaEmbedding>,
}

#[derive(Deserialize)]
struct JinaEmbedding {
    embedding: Vec<f32>,
}

#[async_trait]
impl Embedder for JinaClient {
    /// Generate an embedding for a single text.
    ///
    /// No retries at this layer; a failed or malformed response aborts the
    /// current request.
    async fn embed(&self, text: &str, task: &str) -> Result<Vec<f32>> {
        debug!("Calling Jina embeddings API: {}", self.endpoint);

        let request = JinaRequest {
            model: &self.model,
            task,
            input: vec![JinaInput { text }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| NewsRagError::Embedding(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(NewsRagError::Embedding(format!(
                "Jina API error ({status}): {error_text}"
            )));
        }

        let result: JinaResponse = response
            .json()
            .await
            .map_err(|e| NewsRagError::Embedding(format!("Failed to parse response: {e}")))?;

        result
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| NewsRagError::Embedding("No embedding returned from Jina".to_string()))
    }
}
