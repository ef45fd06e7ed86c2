//! Health check handlers.

use axum::Json;
use axum::extract::State;
use serde_json::json;

use renthub_core::traits::CacheProvider;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/health
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /api/health/detailed — probes database, cache, and storage.
pub async fn detailed_health(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let database = renthub_database::connection::health_check(&state.db_pool)
        .await
        .unwrap_or(false);
    let cache = state.cache.health_check().await.unwrap_or(false);
    let storage = state.storage.health_check().await.unwrap_or(false);

    let healthy = database && cache && storage;
    Ok(Json(json!({
        "status": if healthy { "ok" } else { "degraded" },
        "checks": {
            "database": database,
            "cache": cache,
            "storage": storage,
        }
    })))
}
