//! Shared LLM service with three active profiles: `answer`, `correction`, and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Caches underlying HTTP clients per config (endpoint+model+key+timeout).
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::{ChatMessage, LlmServiceProfiles};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = Arc::new(LlmServiceProfiles::from_env()?);
//!
//! let reply = svc
//!     .answer(&[ChatMessage::user("What is a buffer overflow?")])
//!     .await?;
//! println!("{reply}");
//!
//! let emb = svc.embed("buffer overflow").await?;
//! println!("Embedding dim = {}", emb.len());
//! # Ok(()) }
//! ```

use std::{
    collections::HashMap,
    hash::{Hash, Hasher},
    sync::Arc,
};

use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    chat_message::ChatMessage,
    config::{
        default_config::{config_openai_answer, config_openai_correction, config_openai_embedding},
        llm_model_config::LlmModelConfig,
    },
    error_handler::AiLlmError,
    health_service::{HealthService, HealthStatus},
    services::open_ai_service::OpenAiService,
};

/// Shared service that manages the **answer**, **correction** and **embedding** profiles.
pub struct LlmServiceProfiles {
    answer: LlmModelConfig,
    correction: LlmModelConfig,
    embedding: LlmModelConfig,

    clients: RwLock<HashMap<ClientKey, Arc<OpenAiService>>>,

    health: HealthService,
}

impl std::fmt::Debug for LlmServiceProfiles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmServiceProfiles")
            .field("answer", &self.answer.model)
            .field("correction", &self.correction.model)
            .field("embedding", &self.embedding.model)
            .finish()
    }
}

impl LlmServiceProfiles {
    /// Creates a new service with three profiles.
    ///
    /// - `correction_opt`: if `None`, the answer profile is reused with
    ///   temperature 0 and a 50-token cap.
    /// - `health_timeout_secs`: optional timeout for the health checker.
    pub fn new(
        answer: LlmModelConfig,
        correction_opt: Option<LlmModelConfig>,
        embedding: LlmModelConfig,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self, AiLlmError> {
        let correction = correction_opt.unwrap_or_else(|| LlmModelConfig {
            temperature: Some(0.0),
            max_tokens: Some(50),
            ..answer.clone()
        });

        Ok(Self {
            answer,
            correction,
            embedding,
            clients: RwLock::new(HashMap::new()),
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Builds all three profiles from environment variables.
    ///
    /// See [`crate::config::default_config`] for the variables involved.
    pub fn from_env() -> Result<Self, AiLlmError> {
        Self::new(
            config_openai_answer()?,
            Some(config_openai_correction()?),
            config_openai_embedding()?,
            Some(10),
        )
    }

    /// Generates the student-facing reply for a full conversation.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if the completion fails.
    pub async fn answer(&self, messages: &[ChatMessage]) -> Result<String, AiLlmError> {
        self.chat_with(&self.answer, messages).await
    }

    /// Runs the deterministic query-correction profile.
    pub async fn correct(&self, messages: &[ChatMessage]) -> Result<String, AiLlmError> {
        self.chat_with(&self.correction, messages).await
    }

    /// Computes embeddings using the **embedding** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if embedding fails.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        let cli = self.get_or_init(&self.embedding).await?;
        cli.embeddings(input).await
    }

    /// Returns a health snapshot for all distinct profiles.
    ///
    /// Profiles sharing an identical config are checked only once.
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        let mut list = Vec::<LlmModelConfig>::with_capacity(3);
        for cfg in [&self.answer, &self.correction, &self.embedding] {
            if !list.iter().any(|c| ClientKey::from(c) == ClientKey::from(cfg)) {
                list.push(cfg.clone());
            }
        }
        self.health.check_many(&list).await
    }

    /// Returns references to the current profiles `(answer, correction, embedding)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig, &LlmModelConfig) {
        (&self.answer, &self.correction, &self.embedding)
    }

    /* --------------------- Internals --------------------- */

    async fn chat_with(
        &self,
        cfg: &LlmModelConfig,
        messages: &[ChatMessage],
    ) -> Result<String, AiLlmError> {
        let cli = self.get_or_init(cfg).await?;
        cli.chat(messages).await
    }

    async fn get_or_init(&self, cfg: &LlmModelConfig) -> Result<Arc<OpenAiService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.clients.read().await.get(&key).cloned() {
            return Ok(cli);
        }

        let mut w = self.clients.write().await;
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        debug!(model = %cfg.model, "creating OpenAI client");
        let cli = Arc::new(OpenAiService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }
}

/// Internal cache key to identify unique client configs.
///
/// Sampling options are part of the key because they are baked into each
/// client's request body.
#[derive(Clone)]
struct ClientKey {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<u64>,
    max_tokens: Option<u32>,
    temperature_bits: Option<u32>,
    top_p_bits: Option<u32>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout_secs,
            max_tokens: cfg.max_tokens,
            temperature_bits: cfg.temperature.map(f32::to_bits),
            top_p_bits: cfg.top_p.map(f32::to_bits),
        }
    }
}

impl PartialEq for ClientKey {
    fn eq(&self, other: &Self) -> bool {
        self.endpoint == other.endpoint
            && self.model == other.model
            && self.api_key == other.api_key
            && self.timeout == other.timeout
            && self.max_tokens == other.max_tokens
            && self.temperature_bits == other.temperature_bits
            && self.top_p_bits == other.top_p_bits
    }
}

impl Eq for ClientKey {}

impl Hash for ClientKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.endpoint.hash(state);
        self.model.hash(state);
        if let Some(ref k) = self.api_key {
            k.hash(state);
        } else {
            0usize.hash(state);
        }
        self.timeout.hash(state);
        self.max_tokens.hash(state);
        self.temperature_bits.hash(state);
        self.top_p_bits.hash(state);
    }
}
