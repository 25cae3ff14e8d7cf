//! Records persisted by the store and the values exchanged with it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Author of a stored message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            "system" => Ok(Role::System),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// One message inside an interaction document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Student feedback on an assistant reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Helpful,
    Unhelpful,
}

impl Rating {
    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Helpful => "helpful",
            Rating::Unhelpful => "unhelpful",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "helpful" => Ok(Rating::Helpful),
            "unhelpful" => Ok(Rating::Unhelpful),
            other => Err(format!("unknown rating '{other}'")),
        }
    }
}

/// A stored chat turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interaction {
    pub id: Uuid,
    pub session_id: String,
    /// Always [`Role::Assistant`]: the document is keyed on the reply.
    pub role: Role,
    /// The assistant reply.
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub rating: Option<Rating>,
    pub rated_at: Option<DateTime<Utc>>,
    /// `[user message, assistant message]`.
    pub messages: Vec<StoredMessage>,
}

/// Input for [`crate::ChatStore::append`].
#[derive(Debug, Clone)]
pub struct NewInteraction {
    pub session_id: String,
    pub user_message: String,
    pub reply: String,
}

impl NewInteraction {
    pub fn new(
        session_id: impl Into<String>,
        user_message: impl Into<String>,
        reply: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            user_message: user_message.into(),
            reply: reply.into(),
        }
    }

    /// Materialize the document written by the store.
    pub(crate) fn into_interaction(self, id: Uuid, now: DateTime<Utc>) -> Interaction {
        let messages = vec![
            StoredMessage {
                role: Role::User,
                content: self.user_message,
                timestamp: now,
            },
            StoredMessage {
                role: Role::Assistant,
                content: self.reply.clone(),
                timestamp: now,
            },
        ];
        Interaction {
            id,
            session_id: self.session_id,
            role: Role::Assistant,
            content: self.reply,
            timestamp: now,
            rating: None,
            rated_at: None,
            messages,
        }
    }
}

/// Result of a rating attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingOutcome {
    Rated,
    AlreadyRated,
    NotFound,
}
