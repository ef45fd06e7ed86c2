//! Client-side booking handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use renthub_core::types::pagination::PageResponse;
use renthub_entity::booking::{Booking, BookingView};
use renthub_service::booking::{AvailabilityResult, CheckAvailability, RequestBooking};

use crate::dto::request::{AvailabilityRequest, CreateBookingRequest, DecisionRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// POST /api/client/availability
///
/// The caller gates the query on a selected date range; the check itself
/// is authoritative server-side and is re-run when a booking is created.
pub async fn check_availability(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(req): Json<AvailabilityRequest>,
) -> Result<Json<ApiResponse<AvailabilityResult>>, ApiError> {
    let result = state
        .booking_service
        .check_availability(&CheckAvailability {
            template_id: req.template_id,
            start_time: req.start_time,
            end_time: req.end_time,
            requested_count: req.requested_count,
        })
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// POST /api/client/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<ApiResponse<Booking>>, ApiError> {
    let booking = state
        .booking_service
        .request_booking(
            &auth,
            &RequestBooking {
                template_id: req.template_id,
                start_time: req.start_time,
                end_time: req.end_time,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// GET /api/client/bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<BookingView>>>, ApiError> {
    let page = params.into_page_request();
    let result = state.booking_service.list_client_bookings(&auth, &page).await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/client/bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingView>>, ApiError> {
    let booking = state.booking_service.get_booking(&auth, id).await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// POST /api/client/bookings/{id}/cancel
pub async fn cancel_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<DecisionRequest>,
) -> Result<Json<ApiResponse<BookingView>>, ApiError> {
    let booking = state
        .booking_service
        .cancel(&auth, id, req.message.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(booking)))
}
