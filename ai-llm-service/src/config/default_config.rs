//! Default model configs loaded from environment variables.
//!
//! Three roles share one OpenAI-compatible endpoint and key:
//!
//! - **Answer**     → the model that writes the reply shown to the student
//! - **Correction** → deterministic clean-up of the student's query before retrieval
//! - **Embedding**  → vectorizes the query for the course-material index
//!
//! # Environment variables
//!
//! Common:
//! - `OPENAI_API_KEY`  = bearer token (mandatory)
//! - `OPENAI_BASE_URL` = API base (default `https://api.openai.com`)
//! - `LLM_TIMEOUT_SECS` = request timeout (default 60)
//!
//! Per role:
//! - `OPENAI_CHAT_MODEL` (default `gpt-4o-mini`), `CHAT_TEMPERATURE` (0.7), `CHAT_MAX_TOKENS` (150)
//! - `OPENAI_CORRECTION_MODEL` (default: the chat model), temperature 0, max 50 tokens
//! - `OPENAI_EMBEDDING_MODEL` (default `text-embedding-3-small`)

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{
        AiLlmError, env_opt_f32, env_opt_u32, env_opt_u64, env_or, must_env,
        validate_http_endpoint,
    },
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Endpoint, key and timeout shared by every profile.
struct Shared {
    endpoint: String,
    api_key: String,
    timeout_secs: u64,
}

fn shared() -> Result<Shared, AiLlmError> {
    let endpoint = env_or("OPENAI_BASE_URL", DEFAULT_BASE_URL);
    validate_http_endpoint("OPENAI_BASE_URL", endpoint.trim())?;
    Ok(Shared {
        endpoint,
        api_key: must_env("OPENAI_API_KEY")?,
        timeout_secs: env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS),
    })
}

/// Constructs the config for the **answer** profile.
///
/// # Defaults
/// - `temperature = Some(0.7)`
/// - `max_tokens = Some(150)`
pub fn config_openai_answer() -> Result<LlmModelConfig, AiLlmError> {
    let s = shared()?;
    let cfg = LlmModelConfig {
        model: env_or("OPENAI_CHAT_MODEL", DEFAULT_CHAT_MODEL),
        endpoint: s.endpoint,
        api_key: Some(s.api_key),
        max_tokens: Some(env_opt_u32("CHAT_MAX_TOKENS")?.unwrap_or(150)),
        temperature: Some(env_opt_f32("CHAT_TEMPERATURE")?.unwrap_or(0.7)),
        top_p: None,
        timeout_secs: Some(s.timeout_secs),
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Constructs the config for the **correction** profile.
///
/// The correction pass only rewrites a short query, so it is deterministic
/// and tightly capped.
pub fn config_openai_correction() -> Result<LlmModelConfig, AiLlmError> {
    let s = shared()?;
    let chat_model = env_or("OPENAI_CHAT_MODEL", DEFAULT_CHAT_MODEL);
    let cfg = LlmModelConfig {
        model: env_or("OPENAI_CORRECTION_MODEL", &chat_model),
        endpoint: s.endpoint,
        api_key: Some(s.api_key),
        max_tokens: Some(50),
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(s.timeout_secs),
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Constructs the config for the **embedding** profile.
pub fn config_openai_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let s = shared()?;
    let cfg = LlmModelConfig {
        model: env_or("OPENAI_EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
        endpoint: s.endpoint,
        api_key: Some(s.api_key),
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(s.timeout_secs),
    };
    cfg.validate()?;
    Ok(cfg)
}
