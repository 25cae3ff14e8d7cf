use ai_llm_service::AiLlmError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chat_store::StoreError;
use contextor::ContextorError;
use rag_base::RagBaseError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::core::app_state::ConfigError;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Llm(#[from] AiLlmError),

    #[error(transparent)]
    VectorIndex(#[from] RagBaseError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error(transparent)]
    Chat(#[from] ContextorError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // 4xx
            AppError::Chat(ContextorError::EmptyMessage) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,

            // 5xx
            AppError::Config(_)
            | AppError::Llm(_)
            | AppError::VectorIndex(_)
            | AppError::Bind(_)
            | AppError::Server(_)
            | AppError::Chat(_)
            | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Llm(_) => "LLM_ERROR",
            AppError::VectorIndex(_) => "VECTOR_INDEX_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::Chat(e) => match e {
                ContextorError::EmptyMessage => "MESSAGE_REQUIRED",
                ContextorError::EmptyReply => "EMPTY_REPLY",
                ContextorError::Llm(_) => "LLM_ERROR",
                ContextorError::Rag(_) => "VECTOR_INDEX_ERROR",
                ContextorError::Store(_) => "STORE_ERROR",
                ContextorError::Config(_) => "CONFIG_ERROR",
            },
            AppError::Store(_) => "STORE_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

/// Chat failures keep the shape the chat UI expects: no reply, no history.
#[derive(Serialize)]
struct ChatFailureBody {
    error: String,
    code: &'static str,
    reply: Option<String>,
    history: Vec<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        let message = self.to_string();

        if status.is_server_error() {
            error!(%status, code, error = %message, "request failed");
        }

        match self {
            AppError::Chat(_) if status.is_server_error() => (
                status,
                Json(ChatFailureBody {
                    error: message,
                    code,
                    reply: None,
                    history: Vec::new(),
                }),
            )
                .into_response(),
            _ => (
                status,
                Json(ErrorBody {
                    error: message,
                    code,
                }),
            )
                .into_response(),
        }
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn empty_message_maps_to_400() {
        let (status, body) = body_json(ContextorError::EmptyMessage.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Message is required");
        assert!(body.get("reply").is_none());
    }

    #[tokio::test]
    async fn chat_failure_has_null_reply_and_empty_history() {
        let (status, body) = body_json(ContextorError::EmptyReply.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Empty or invalid reply from OpenAI");
        assert_eq!(body["code"], "EMPTY_REPLY");
        assert!(body["reply"].is_null());
        assert_eq!(body["history"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn conflict_maps_to_409() {
        let (status, body) = body_json(AppError::Conflict("already rated".into())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");
    }
}
