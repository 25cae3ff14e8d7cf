use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use chat_store::{ChatStore, SqliteChatStore, StoreConfig};
use contextor::{ChatPipeline, ContextorConfig};
use rag_base::CourseIndex;
use thiserror::Error;
use tracing::info;

use crate::error_handler::AppError;

const DEFAULT_HISTORY_LIMIT: usize = 20;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// HTTP-layer settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address, e.g. "0.0.0.0:8080".
    pub address: String,
    /// Messages returned by the history endpoint.
    pub history_limit: usize,
}

impl ServerConfig {
    /// Reads `API_ADDRESS` (required) and `HISTORY_LIMIT` (default 20).
    pub fn from_env() -> Result<Self, ConfigError> {
        let address = std::env::var("API_ADDRESS")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVar("API_ADDRESS"))?;

        let history_limit = match std::env::var("HISTORY_LIMIT") {
            Ok(raw) if !raw.trim().is_empty() => {
                raw.trim()
                    .parse::<usize>()
                    .map_err(|e| ConfigError::Invalid {
                        var: "HISTORY_LIMIT",
                        reason: e.to_string(),
                    })?
            }
            _ => DEFAULT_HISTORY_LIMIT,
        };

        Ok(Self {
            address,
            history_limit,
        })
    }
}

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: ChatPipeline,
    pub store: Arc<dyn ChatStore>,
    /// Probed by `/health`; `None` skips the LLM checks.
    pub llm: Option<Arc<LlmServiceProfiles>>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(
        pipeline: ChatPipeline,
        store: Arc<dyn ChatStore>,
        llm: Option<Arc<LlmServiceProfiles>>,
        config: ServerConfig,
    ) -> Self {
        Self {
            pipeline,
            store,
            llm,
            config,
        }
    }

    /// Wire every backend from environment variables.
    pub async fn from_env() -> Result<Self, AppError> {
        let config = ServerConfig::from_env()?;
        let llm = Arc::new(LlmServiceProfiles::from_env()?);
        let index = Arc::new(CourseIndex::from_env()?);
        let store: Arc<dyn ChatStore> =
            Arc::new(SqliteChatStore::connect(&StoreConfig::from_env()?).await?);
        let pipeline_cfg = ContextorConfig::from_env()?;

        {
            let (answer, correction, embedding) = llm.profiles();
            info!(
                answer_model = %answer.model,
                correction_model = %correction.model,
                embedding_model = %embedding.model,
                collection = %index.config().qdrant.collection,
                namespace = %index.config().qdrant.namespace,
                context_turns = pipeline_cfg.context_turns,
                top_k = pipeline_cfg.top_k,
                "backends configured"
            );
        }

        let pipeline = ChatPipeline::new(
            llm.clone(),
            llm.clone(),
            index,
            store.clone(),
            pipeline_cfg,
        );

        Ok(Self::new(pipeline, store, Some(llm), config))
    }
}
