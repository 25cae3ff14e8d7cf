use std::{error::Error, sync::Arc};

mod core;
mod error_handler;
mod middleware_layer;
mod routes;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tracing::{error, info};

pub use crate::core::app_state::{AppState, ConfigError, ServerConfig};
pub use crate::error_handler::AppError;
pub use crate::middleware_layer::request_id::X_REQUEST_ID;

use crate::{
    middleware_layer::request_id::request_id,
    routes::{
        chat::chat_route::chat, health::health_route::health,
        history::history_route::chat_history, rating::rate_message_route::rate_message,
    },
};

/// Build the HTTP router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/chat-history", get(chat_history))
        .route("/api/rate-message", post(rate_message))
        .route("/health", get(health))
        .layer(middleware::from_fn(request_id))
        .with_state(state)
}

/// Wire backends from the environment and serve until Ctrl+C.
pub async fn start() -> Result<(), Box<dyn Error>> {
    let state = AppState::from_env().await?;
    let address = state.config.address.clone();
    let app = router(Arc::new(state));

    // Bind to address
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(AppError::Bind)?;
    info!(%address, "listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
    }
}
