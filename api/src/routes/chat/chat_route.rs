//! POST /api/chat: answers a student question with course context.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use contextor::{ChatAnswer, ContextorError};
use tracing::debug;

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::chat::chat_request::{ChatRequest, ChatResponse},
};

/// Handler: POST /api/chat
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/api/chat \
///   -H 'content-type: application/json' \
///   -d '{"message":"What is a risk register?","sessionId":"abc"}'
/// ```
pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let Json(body) = body.map_err(|rejection| {
        debug!(error = %rejection, "chat body rejected");
        ContextorError::EmptyMessage
    })?;

    let message = body.message.unwrap_or_default();
    let ChatAnswer {
        reply,
        session_id,
        message_id,
        history,
    } = state.pipeline.answer(&message, body.session_id).await?;

    Ok(Json(ChatResponse {
        reply,
        session_id,
        message_id: message_id.to_string(),
        history,
    }))
}
