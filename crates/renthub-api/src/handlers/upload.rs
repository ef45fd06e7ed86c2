//! Direct-to-storage upload and media serving handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::Response;
use bytes::Bytes;

use renthub_core::error::AppError;

use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// PUT /api/uploads/{ticket} — single-shot binary upload.
///
/// The ticket is the authorization; outcome is the HTTP status. No
/// retry bookkeeping, no resumability.
pub async fn put_upload(
    State(state): State<AppState>,
    Path(ticket): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<ApiResponse<MessageResponse>>), ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let path = state.storage.store_upload(&ticket, content_type, body).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(MessageResponse::new(format!(
            "Stored at {path}"
        )))),
    ))
}

/// GET /api/media/{*path} — streams a stored object.
pub async fn get_media(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    let stream = state.storage.read(&path).await?;

    let content_type = guess_content_type(&path);
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}

/// Content type from the file extension; octet-stream when unknown.
fn guess_content_type(path: &str) -> &'static str {
    match path.rsplit('.').next().map(str::to_ascii_lowercase).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type("machines/a/front.JPG"), "image/jpeg");
        assert_eq!(guess_content_type("a/b.png"), "image/png");
        assert_eq!(guess_content_type("a/b.bin"), "application/octet-stream");
    }
}
