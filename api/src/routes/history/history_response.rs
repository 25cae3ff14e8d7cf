use chat_store::{Role, StoredMessage};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// One bubble in the chat UI.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HistoryEntry {
    /// "user" or "bot".
    pub sender: &'static str,
    pub text: String,
}

impl From<StoredMessage> for HistoryEntry {
    fn from(msg: StoredMessage) -> Self {
        let sender = match msg.role {
            Role::User => "user",
            Role::Assistant | Role::System => "bot",
        };
        Self {
            sender,
            text: msg.content,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
}
