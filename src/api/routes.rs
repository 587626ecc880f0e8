//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers::AppState;
use super::handlers::{
    self,
};

/// Create RESTful API router
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // RAG query
        .route("/query", post(handlers::rag_query))
        // Chat endpoints
        .route("/chat", post(handlers::chat))
        .route("/session/:id/history", get(handlers::session_history))
        .route("/session/:id/clear", post(handlers::clear_session))
        .with_state(state)
}
