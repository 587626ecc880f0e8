//! Qdrant REST search client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::config::QdrantConfig;
use crate::errors::NewsRagError;
use crate::errors::Result;
use crate::models::RetrievedPoint;
use crate::vector::VectorSearch;

/// Client for Qdrant's points/search REST endpoint.
///
/// The collection name is bound separately from construction so that using
/// the client before setup surfaces as a typed error instead of a 404 from
/// the provider.
pub struct QdrantClient {
    client: Client,
    base_url: String,
    collection: Option<String>,
}

impl QdrantClient {
    /// Create a client for the given Qdrant endpoint, with no collection
    /// bound yet
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| NewsRagError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            collection: None,
        })
    }

    /// Create a client from config with its collection already bound
    pub fn connect(config: &QdrantConfig) -> Result<Self> {
        let mut client = Self::new(&config.resolve_url())?;
        client.bind_collection(&config.collection);
        Ok(client)
    }

    /// Bind the collection searched by this client
    pub fn bind_collection(&mut self, name: impl Into<String>) {
        self.collection = Some(name.into());
    }

    pub fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    vector: &'a [f32],
    limit: usize,
    with_payload: bool,
    with_vector: bool,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<RetrievedPoint>,
}

#[async_trait]
impl VectorSearch for QdrantClient {
    /// Search the bound collection.
    ///
    /// Results keep the provider's descending-score order; no local
    /// re-sorting is performed.
    async fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<RetrievedPoint>> {
        let collection = self
            .collection
            .as_deref()
            .ok_or(NewsRagError::NotInitialized(
                "vector index collection not bound",
            ))?;

        let url = format!("{}/collections/{collection}/points/search", self.base_url);
        debug!("Calling Qdrant search API: {url}");

        let request = SearchRequest {
            vector,
            limit,
            with_payload: true,
            with_vector: false,
        };

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| NewsRagError::Retrieval(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(NewsRagError::Retrieval(format!(
                "Qdrant API error ({status}): {error_text}"
            )));
        }

        let result: SearchResponse = response
            .json()
            .await
            .map_err(|e| NewsRagError::Retrieval(format!("Failed to parse response: {e}")))?;

        Ok(result.result)
    }
}
