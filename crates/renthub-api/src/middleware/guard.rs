//! Session gate for protected route groups.
//!
//! Blocks protected content until the session resolves. Browser
//! navigation (requests accepting HTML) is answered with a `303` to the
//! login route carrying the original path in a `redirect` parameter;
//! API callers get a structured `401`. This gate is derived state only:
//! every handler still authorizes through `AuthUser` and the service
//! layer's ownership checks.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use renthub_core::error::AppError;

use crate::error::ApiError;
use crate::extractors::auth::token_from_parts;
use crate::state::AppState;

/// Login route the gate redirects browsers to.
const LOGIN_ROUTE: &str = "/auth/login";

/// Middleware guarding the `/client/*`, `/owner/*`, and `/profile` groups.
pub async fn session_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();

    let authorized = match token_from_parts(&parts) {
        Some(token) => match state.jwt_decoder.decode_access_token(&token).await {
            Ok(claims) => state
                .session_manager
                .validate_session(claims.session_id())
                .await
                .is_ok(),
            Err(_) => false,
        },
        None => false,
    };

    if !authorized {
        if accepts_html(&parts) {
            let target = format!("{LOGIN_ROUTE}?redirect={}", parts.uri.path());
            return Redirect::to(&target).into_response();
        }
        return ApiError(AppError::unauthorized("Sign in to access this resource"))
            .into_response();
    }

    next.run(Request::from_parts(parts, body)).await
}

/// Whether the request prefers an HTML answer (browser navigation).
fn accepts_html(parts: &axum::http::request::Parts) -> bool {
    parts
        .headers
        .get("accept")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}
