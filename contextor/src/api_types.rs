//! Public API types re-used by external crates (e.g., the HTTP API layer).

use ai_llm_service::ChatMessage;
use uuid::Uuid;

/// Outcome of one chat turn.
///
/// `history` is the conversation sent to the model *before* the retrieved
/// context was appended: system message, prior turns, then the user message.
#[derive(Clone, Debug)]
pub struct ChatAnswer {
    pub reply: String,
    pub session_id: String,
    pub message_id: Uuid,
    pub history: Vec<ChatMessage>,
}
