//! Authentication handlers: register, login, logout, refresh, session.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use validator::Validate;

use renthub_auth::session::LoginResult;

use crate::dto::request::{LoginRequest, RefreshRequest, RegisterRequest};
use crate::dto::response::{ApiResponse, LoginResponse, MessageResponse, SessionResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    req.validate()?;

    let result = state
        .session_manager
        .register(
            &req.name,
            &req.email,
            &req.password,
            req.role,
            &client_ip(&headers),
            user_agent(&headers).as_deref(),
        )
        .await?;

    Ok(Json(ApiResponse::ok(login_response(result))))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    req.validate()?;

    let result = state
        .session_manager
        .login(
            &req.email,
            &req.password,
            &client_ip(&headers),
            user_agent(&headers).as_deref(),
        )
        .await?;

    Ok(Json(ApiResponse::ok(login_response(result))))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let token = bearer_token(&headers)
        .ok_or_else(|| renthub_core::AppError::unauthorized("Missing authentication token"))?;
    let claims = state.jwt_decoder.decode_access_token(&token).await?;

    state.session_manager.logout(&claims).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Signed out"))))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<renthub_auth::jwt::TokenPair>>, ApiError> {
    let tokens = state.session_manager.refresh(&req.refresh_token).await?;
    Ok(Json(ApiResponse::ok(tokens)))
}

/// GET /api/auth/session — the current session, or 401 when unauthenticated.
pub async fn session(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<SessionResponse>>, ApiError> {
    let session = state.session_manager.validate_session(auth.session_id).await?;
    let user = state.profile_service.get(&auth).await?;

    Ok(Json(ApiResponse::ok(SessionResponse {
        session_id: session.id,
        user: user.into(),
        ip_address: session.ip_address,
        user_agent: session.user_agent,
        expires_at: session.expires_at,
    })))
}

fn login_response(result: LoginResult) -> LoginResponse {
    LoginResponse {
        access_token: result.tokens.access_token,
        refresh_token: result.tokens.refresh_token,
        access_expires_at: result.tokens.access_expires_at,
        refresh_expires_at: result.tokens.refresh_expires_at,
        user: result.user.into(),
    }
}

fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .unwrap_or("unknown")
        .trim()
        .to_string()
}

fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(String::from)
}
