//! Booking message thread handlers, shared by both participants.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;
use validator::Validate;

use renthub_entity::booking::BookingMessage;

use crate::dto::request::SendMessageRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/bookings/{id}/messages
pub async fn list_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<BookingMessage>>>, ApiError> {
    let messages = state.booking_service.list_messages(&auth, id).await?;
    Ok(Json(ApiResponse::ok(messages)))
}

/// POST /api/bookings/{id}/messages
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<ApiResponse<BookingMessage>>, ApiError> {
    req.validate()?;

    let message = state
        .booking_service
        .send_message(&auth, id, &req.content)
        .await?;
    Ok(Json(ApiResponse::ok(message)))
}
