//! Vector index client

pub mod client;

pub use client::QdrantClient;

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::RetrievedPoint;

/// Returns the stored documents nearest to a query vector, in the
/// provider's descending-similarity order
#[async_trait]
pub trait VectorSearch: Send + Sync {
    async fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<RetrievedPoint>>;
}
