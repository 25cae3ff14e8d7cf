//! Shared LLM service for the teaching assistant.
//!
//! Three logical profiles are exposed through [`service_profiles::LlmServiceProfiles`]:
//! - **answer**: the completion model that writes replies to students
//! - **correction**: a cheap, deterministic pass that cleans up the query
//! - **embedding**: the model used to vectorize queries for retrieval

pub mod chat_message;
pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use chat_message::{ChatMessage, ChatRole};
pub use config::llm_model_config::LlmModelConfig;
pub use error_handler::AiLlmError;
pub use health_service::HealthStatus;
pub use service_profiles::LlmServiceProfiles;
