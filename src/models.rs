//! Shared data model for the RAG pipeline

use serde::Deserialize;
use serde::Serialize;

/// A document returned by the vector index, in provider order.
///
/// Qdrant point ids may be integers or UUID strings and payloads are
/// arbitrary JSON, so both stay opaque `serde_json::Value`s here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPoint {
    pub id: serde_json::Value,
    pub score: f32,
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// The unit stored in and served from the query cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerPayload {
    pub answer: String,
    pub sources: Vec<RetrievedPoint>,
    /// Always `false` at write time; re-tagged `true` when served from cache
    pub cached: bool,
}
