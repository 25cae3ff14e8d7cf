use serde::{Deserialize, Serialize};

/// Request payload for /api/rate-message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateMessageRequest {
    pub message_id: String,
    /// "helpful" or "unhelpful".
    pub rating: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateMessageResponse {
    pub success: bool,
    pub message_id: String,
    pub rating: &'static str,
}
