//! GET /api/chat-history: recent messages for the chat window.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use tracing::{debug, warn};

use crate::{
    core::app_state::AppState,
    routes::history::history_response::{HistoryEntry, HistoryQuery, HistoryResponse},
};

/// Handler: GET /api/chat-history[?sessionId=...]
///
/// Never fails: store errors and bad query strings yield an empty history so
/// the chat window still loads.
pub async fn chat_history(
    State(state): State<Arc<AppState>>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Json<HistoryResponse> {
    let session_id = match query {
        Ok(Query(q)) => q.session_id.filter(|s| !s.trim().is_empty()),
        Err(rejection) => {
            debug!(error = %rejection, "history query rejected; reading all sessions");
            None
        }
    };

    let history = match state
        .store
        .recent_messages(session_id.as_deref(), state.config.history_limit)
        .await
    {
        Ok(messages) => messages.into_iter().map(HistoryEntry::from).collect(),
        Err(err) => {
            warn!(error = %err, "failed to load chat history; returning empty list");
            Vec::new()
        }
    };

    Json(HistoryResponse { history })
}
