//! `AuthUser` extractor — resolves the session token, validates it, and
//! injects the request context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use renthub_core::error::AppError;
use renthub_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Cookie used by browser navigation; API clients send a bearer header.
pub const SESSION_COOKIE: &str = "renthub_token";

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts)
            .ok_or_else(|| AppError::unauthorized("Missing authentication token"))?;

        let claims = state.jwt_decoder.decode_access_token(&token).await?;
        state
            .session_manager
            .validate_session(claims.session_id())
            .await?;

        let ip_address = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        let user_agent = parts
            .headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let ctx = RequestContext::new(
            claims.user_id(),
            claims.session_id(),
            claims.role,
            claims.email,
            claims.name,
            ip_address,
            user_agent,
        );

        Ok(AuthUser(ctx))
    }
}

/// Pulls the access token from the Authorization header or the session cookie.
pub fn token_from_parts(parts: &Parts) -> Option<String> {
    if let Some(token) = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        return Some(token.to_string());
    }

    parts
        .headers
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(cookie_value)
}

/// Finds the session cookie in a Cookie header value.
fn cookie_value(header: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value() {
        assert_eq!(
            cookie_value("theme=dark; renthub_token=abc.def.ghi; lang=en"),
            Some("abc.def.ghi".to_string())
        );
        assert_eq!(cookie_value("theme=dark"), None);
    }
}
