/// API request handlers
use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::api::types::HealthResponse;
use crate::cache::Cache;
use crate::chat::ChatService;
use crate::rag::RagPipeline;

// Re-export sub-modules
pub mod chat;
pub mod rag;

// Re-export handlers
pub use chat::*;
pub use rag::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<RagPipeline>,
    pub chat: Arc<ChatService>,
    pub cache: Arc<dyn Cache>,
    pub collection: String,
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let redis = if state.cache.ping().await {
        "connected"
    } else {
        "not_connected"
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Backend is running".to_string(),
        redis: redis.to_string(),
        collection_name: state.collection.clone(),
    })
}
