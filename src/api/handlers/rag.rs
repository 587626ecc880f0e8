/// RAG query handler
use axum::extract::State;
use axum::Json;
use tracing::error;
use tracing::info;

use super::AppState;
use crate::api::types::bad_request;
use crate::api::types::internal_error;
use crate::api::types::ApiError;
use crate::api::types::QueryRequest;
use crate::errors::NewsRagError;
use crate::models::AnswerPayload;

/// RAG query (POST /api/query)
pub async fn rag_query(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<AnswerPayload>, ApiError> {
    // Validate before the pipeline so a blank query triggers no remote call
    if req.query.trim().is_empty() {
        return Err(bad_request("query is required"));
    }

    info!("POST /api/query: {}", req.query);

    match state.pipeline.run_query(&req.query).await {
        Ok(payload) => Ok(Json(payload)),
        Err(NewsRagError::Validation(message)) => Err(bad_request(message)),
        Err(e) => {
            error!("Error in /api/query: {e}");
            Err(internal_error(
                "Internal server error while processing RAG query.",
            ))
        }
    }
}
