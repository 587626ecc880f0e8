/// Chat and session handlers
use axum::extract::Path;
use axum::extract::State;
use axum::Json;
use tracing::error;
use tracing::info;

use super::AppState;
use crate::api::types::bad_request;
use crate::api::types::internal_error;
use crate::api::types::ApiError;
use crate::api::types::ChatRequest;
use crate::api::types::ClearResponse;
use crate::api::types::HistoryResponse;
use crate::chat::ChatOutcome;
use crate::errors::NewsRagError;

/// Chat turn (POST /api/chat)
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatOutcome>, ApiError> {
    if req.session_id.trim().is_empty() || req.user_message.trim().is_empty() {
        return Err(bad_request("sessionId and userMessage are required"));
    }

    info!("POST /api/chat: session={}", req.session_id);

    match state.chat.process_chat(&req.session_id, &req.user_message).await {
        Ok(outcome) => Ok(Json(outcome)),
        Err(NewsRagError::Validation(message)) => Err(bad_request(message)),
        Err(e) => {
            error!("Error in /api/chat: {e}");
            Err(internal_error(
                "Internal server error while processing chat.",
            ))
        }
    }
}

/// Session transcript (GET /api/session/:id/history)
pub async fn session_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<HistoryResponse> {
    let history = state.chat.history(&session_id).await;
    Json(HistoryResponse {
        session_id,
        history,
    })
}

/// Clear a session transcript (POST /api/session/:id/clear)
pub async fn clear_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<ClearResponse> {
    state.chat.clear_history(&session_id).await;
    Json(ClearResponse {
        session_id,
        cleared: true,
    })
}
