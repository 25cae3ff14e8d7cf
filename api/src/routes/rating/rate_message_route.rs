//! POST /api/rate-message: one-time helpful/unhelpful feedback on a reply.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use chat_store::{Rating, RatingOutcome};
use tracing::info;
use uuid::Uuid;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::rating::rate_message_request::{RateMessageRequest, RateMessageResponse},
};

/// Handler: POST /api/rate-message
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/api/rate-message \
///   -H 'content-type: application/json' \
///   -d '{"messageId":"6f1c...","rating":"helpful"}'
/// ```
pub async fn rate_message(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RateMessageRequest>, JsonRejection>,
) -> AppResult<Json<RateMessageResponse>> {
    let Json(body) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let id = Uuid::parse_str(body.message_id.trim())
        .map_err(|_| AppError::BadRequest("Invalid messageId".into()))?;
    let rating: Rating = body.rating.parse().map_err(AppError::BadRequest)?;

    match state.store.rate(id, rating).await? {
        RatingOutcome::Rated => {
            info!(message_id = %id, %rating, "message rated");
            Ok(Json(RateMessageResponse {
                success: true,
                message_id: id.to_string(),
                rating: rating.as_str(),
            }))
        }
        RatingOutcome::AlreadyRated => Err(AppError::Conflict(
            "Message has already been rated".into(),
        )),
        RatingOutcome::NotFound => Err(AppError::NotFound("Message not found".into())),
    }
}
