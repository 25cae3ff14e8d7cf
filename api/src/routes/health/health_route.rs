//! GET /health: store and LLM reachability.

use std::sync::Arc;

use ai_llm_service::HealthStatus;
use axum::{Json, extract::State};
use serde::Serialize;
use tracing::warn;

use crate::core::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok" when every probe passed, otherwise "degraded".
    pub status: &'static str,
    pub store: bool,
    pub llm: Vec<HealthStatus>,
}

/// Handler: GET /health. Always 200; failures show up in the body.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let store = match state.store.ping().await {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "store ping failed");
            false
        }
    };

    let llm = match &state.llm {
        Some(profiles) => profiles.health_all().await,
        None => Vec::new(),
    };

    let healthy = store && llm.iter().all(|s| s.ok);
    Json(HealthResponse {
        status: if healthy { "ok" } else { "degraded" },
        store,
        llm,
    })
}
