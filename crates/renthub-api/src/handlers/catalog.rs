//! Public catalog handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use renthub_core::types::pagination::{PageRequest, PageResponse};
use renthub_entity::machine::MachineWithStats;

use crate::dto::request::CatalogQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/catalog
pub async fn list_catalog(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<ApiResponse<PageResponse<MachineWithStats>>>, ApiError> {
    let default = PageRequest::default();
    let page = PageRequest::new(
        query.page.unwrap_or(default.page),
        query.page_size.unwrap_or(default.page_size),
    );

    let result = state
        .catalog_service
        .list(query.category.as_deref(), query.search.as_deref(), &page)
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/catalog/{id}
pub async fn get_machine(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MachineWithStats>>, ApiError> {
    let machine = state.catalog_service.get_detail(id).await?;
    Ok(Json(ApiResponse::ok(machine)))
}
