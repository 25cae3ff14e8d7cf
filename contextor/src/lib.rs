//! Chat orchestration for the course assistant.
//!
//! Public API: [`ChatPipeline::answer`]. It loads the session's recent turns,
//! normalizes the question, embeds it while opening the course index, fetches
//! top-K snippets, asks the answer profile and stores the exchange.

mod api_types;
mod cfg;
pub mod correct;
mod error;
pub mod ports;
pub mod prompt;

use std::sync::Arc;
use std::time::Instant;

use chat_store::{ChatStore, NewInteraction};
use chrono::{SecondsFormat, Utc};
use tracing::{debug, info};

pub use api_types::ChatAnswer;
pub use cfg::ContextorConfig;
pub use error::ContextorError;
pub use ports::{ChatModel, Embedder, SnippetIndex, SnippetNamespace};

/// One question in, one stored answer out.
#[derive(Clone)]
pub struct ChatPipeline {
    model: Arc<dyn ChatModel>,
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn SnippetIndex>,
    store: Arc<dyn ChatStore>,
    cfg: ContextorConfig,
}

impl ChatPipeline {
    pub fn new(
        model: Arc<dyn ChatModel>,
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn SnippetIndex>,
        store: Arc<dyn ChatStore>,
        cfg: ContextorConfig,
    ) -> Self {
        Self {
            model,
            embedder,
            index,
            store,
            cfg,
        }
    }

    pub fn config(&self) -> &ContextorConfig {
        &self.cfg
    }

    /// Answer `message` within `session_id` (a fresh RFC 3339 timestamp when absent).
    ///
    /// Nothing is stored unless every step succeeds.
    ///
    /// # Errors
    /// - [`ContextorError::EmptyMessage`] for a blank message.
    /// - [`ContextorError::EmptyReply`] when the model returns no content.
    /// - Store, embedding, index and completion failures as their wrapped variants.
    pub async fn answer(
        &self,
        message: &str,
        session_id: Option<String>,
    ) -> Result<ChatAnswer, ContextorError> {
        if message.trim().is_empty() {
            return Err(ContextorError::EmptyMessage);
        }
        let session_id = session_id
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));

        let started = Instant::now();

        let prior = self
            .store
            .session_interactions(&session_id, self.cfg.context_turns)
            .await?;
        let history = prompt::build_conversation(&prior, message);

        let query = correct::normalize_question(self.model.as_ref(), message).await;
        debug!(session_id = %session_id, query = %query, "normalized question");

        let (vector, namespace) =
            tokio::try_join!(self.embedder.embed(&query), self.index.open())?;
        let snippets = namespace.query(vector, self.cfg.top_k).await?;

        let mut messages = history.clone();
        messages.push(prompt::context_message(&snippets));

        let reply = self.model.answer(&messages).await?;
        if reply.trim().is_empty() {
            return Err(ContextorError::EmptyReply);
        }

        let stored = self
            .store
            .append(NewInteraction::new(session_id.as_str(), message, reply.as_str()))
            .await?;

        info!(
            session_id = %session_id,
            message_id = %stored.id,
            prior_turns = prior.len(),
            snippets = snippets.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "chat turn answered"
        );

        Ok(ChatAnswer {
            reply,
            session_id,
            message_id: stored.id,
            history,
        })
    }
}
