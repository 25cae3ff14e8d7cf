//! Typed error for the contextor crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextorError {
    /// The user message was missing or blank.
    #[error("Message is required")]
    EmptyMessage,

    /// The completion API answered without usable content.
    #[error("Empty or invalid reply from OpenAI")]
    EmptyReply,

    /// Errors from the hosted LLM client.
    #[error(transparent)]
    Llm(#[from] ai_llm_service::AiLlmError),

    /// Errors from the vector index.
    #[error("vector index error: {0}")]
    Rag(#[from] rag_base::RagBaseError),

    /// Errors from the interaction store.
    #[error(transparent)]
    Store(#[from] chat_store::StoreError),

    /// Bad environment configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}
