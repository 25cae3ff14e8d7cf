use ai_llm_service::ChatMessage;
use serde::{Deserialize, Serialize};

/// Request payload for /api/chat.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Student question. Missing and blank are both rejected with 400.
    #[serde(default)]
    pub message: Option<String>,
    /// Conversation key; the server mints one when absent.
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Response payload for /api/chat.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub reply: String,
    pub session_id: String,
    /// Id to pass to /api/rate-message.
    pub message_id: String,
    /// Conversation sent to the model (system, prior turns, this message).
    pub history: Vec<ChatMessage>,
}
