//! Embedding provider client

pub mod client;

pub use client::JinaClient;

use async_trait::async_trait;

use crate::errors::Result;

/// Task hint for queries being embedded for retrieval
pub const RETRIEVAL_QUERY_TASK: &str = "retrieval.query";

/// Converts text to a fixed-dimension vector via a remote provider
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str, task: &str) -> Result<Vec<f32>>;
}
