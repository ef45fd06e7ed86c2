//! Profile handlers.

use axum::Json;
use axum::extract::State;

use renthub_entity::user::UpdateProfile;

use crate::dto::request::UpdateProfileRequest;
use crate::dto::response::{ApiResponse, ProfileResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<ProfileResponse>>, ApiError> {
    let user = state.profile_service.get(&auth).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PUT /api/profile — email is read-only and not accepted here.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<ProfileResponse>>, ApiError> {
    let user = state
        .profile_service
        .update(
            &auth,
            UpdateProfile {
                name: req.name,
                phone: req.phone,
                address: req.address,
                city: req.city,
                state: req.state,
                zip_code: req.zip_code,
                image_url: req.image_url,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(user.into())))
}
