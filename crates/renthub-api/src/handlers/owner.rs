//! Owner-side handlers: machines, instances, booking decisions, dashboard.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;
use validator::Validate;

use renthub_core::types::pagination::{PageRequest, PageResponse};
use renthub_entity::booking::{BookingStatus, BookingView};
use renthub_entity::machine::{MachineInstance, MachineTemplate, MachineWithStats, UpdateMachine};
use renthub_service::dashboard::OwnerDashboard;
use renthub_service::machine::service::ListMachine;
use renthub_storage::manager::PresignedUpload;

use crate::dto::request::{
    AddInstanceRequest, CreateMachineRequest, DecisionRequest, OwnerBookingsQuery,
    PresignImageRequest, ReasonRequest, SetInstanceActiveRequest, UpdateMachineRequest,
};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

// ── Machines ───────────────────────────────────────────────

/// GET /api/owner/machines
pub async fn list_machines(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<MachineWithStats>>>, ApiError> {
    let machines = state.machine_service.list_own(&auth).await?;
    Ok(Json(ApiResponse::ok(machines)))
}

/// POST /api/owner/machines
pub async fn create_machine(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateMachineRequest>,
) -> Result<Json<ApiResponse<MachineTemplate>>, ApiError> {
    req.validate()?;

    let machine = state
        .machine_service
        .create(
            &auth,
            ListMachine {
                name: req.name,
                code: req.code,
                description: req.description,
                category: req.category,
                price_per_hour_cents: req.price_per_hour_cents,
                specs: req.specs,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(machine)))
}

/// PUT /api/owner/machines/{id}
pub async fn update_machine(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateMachineRequest>,
) -> Result<Json<ApiResponse<MachineTemplate>>, ApiError> {
    let machine = state
        .machine_service
        .update(
            &auth,
            id,
            UpdateMachine {
                name: req.name,
                description: req.description,
                category: req.category,
                price_per_hour_cents: req.price_per_hour_cents,
                specs: req.specs,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(machine)))
}

/// DELETE /api/owner/machines/{id}
pub async fn delete_machine(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.machine_service.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Machine deleted"))))
}

/// GET /api/owner/machines/{id}/instances
pub async fn list_instances(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<MachineInstance>>>, ApiError> {
    let instances = state.machine_service.list_instances(&auth, id).await?;
    Ok(Json(ApiResponse::ok(instances)))
}

/// POST /api/owner/machines/{id}/instances
pub async fn add_instance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<AddInstanceRequest>,
) -> Result<Json<ApiResponse<MachineInstance>>, ApiError> {
    req.validate()?;

    let instance = state
        .machine_service
        .add_instance(&auth, id, &req.code, req.active)
        .await?;
    Ok(Json(ApiResponse::ok(instance)))
}

/// PUT /api/owner/instances/{id}
pub async fn set_instance_active(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<SetInstanceActiveRequest>,
) -> Result<Json<ApiResponse<MachineInstance>>, ApiError> {
    let instance = state
        .machine_service
        .set_instance_active(&auth, id, req.active)
        .await?;
    Ok(Json(ApiResponse::ok(instance)))
}

/// POST /api/owner/machines/{id}/images/presign
pub async fn presign_image(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<PresignImageRequest>,
) -> Result<Json<ApiResponse<PresignedUpload>>, ApiError> {
    req.validate()?;

    let upload = state
        .machine_service
        .presign_image(&auth, id, &req.file_name, &req.content_type)
        .await?;
    Ok(Json(ApiResponse::ok(upload)))
}

// ── Bookings ───────────────────────────────────────────────

/// GET /api/owner/bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OwnerBookingsQuery>,
) -> Result<Json<ApiResponse<PageResponse<BookingView>>>, ApiError> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<BookingStatus>)
        .transpose()?;
    let default = PageRequest::default();
    let page = PageRequest::new(
        query.page.unwrap_or(default.page),
        query.page_size.unwrap_or(default.page_size),
    );

    let result = state
        .booking_service
        .list_owner_bookings(&auth, status, &page)
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/owner/bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingView>>, ApiError> {
    let booking = state.booking_service.get_booking(&auth, id).await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// POST /api/owner/bookings/{id}/approve
pub async fn approve_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<DecisionRequest>,
) -> Result<Json<ApiResponse<BookingView>>, ApiError> {
    let booking = state
        .booking_service
        .approve(&auth, id, req.message.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// POST /api/owner/bookings/{id}/reject
pub async fn reject_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<ReasonRequest>,
) -> Result<Json<ApiResponse<BookingView>>, ApiError> {
    req.validate()?;

    let booking = state.booking_service.reject(&auth, id, &req.message).await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// POST /api/owner/bookings/{id}/send-back
pub async fn send_back_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<ReasonRequest>,
) -> Result<Json<ApiResponse<BookingView>>, ApiError> {
    req.validate()?;

    let booking = state
        .booking_service
        .send_back(&auth, id, &req.message)
        .await?;
    Ok(Json(ApiResponse::ok(booking)))
}

// ── Dashboard ──────────────────────────────────────────────

/// GET /api/owner/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<OwnerDashboard>>, ApiError> {
    let dashboard = state.dashboard_service.owner_dashboard(&auth).await?;
    Ok(Json(ApiResponse::ok(dashboard)))
}
