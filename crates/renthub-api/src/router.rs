//! Route definitions for the RentHub HTTP API.
//!
//! All routes are organized by actor namespace and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor. Protected groups sit behind the session
//! gate middleware.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes as usize;

    let protected = Router::new()
        .merge(client_routes())
        .merge(owner_routes())
        .merge(profile_routes())
        .merge(message_routes())
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::guard::session_gate,
        ));

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(catalog_routes())
        .merge(upload_routes())
        .merge(health_routes())
        .merge(protected);

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Auth endpoints: register, login, logout, refresh, session
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/session", get(handlers::auth::session))
}

/// Public catalog endpoints
fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(handlers::catalog::list_catalog))
        .route("/catalog/{id}", get(handlers::catalog::get_machine))
}

/// Client namespace: availability and own bookings
fn client_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/client/availability",
            post(handlers::client::check_availability),
        )
        .route(
            "/client/bookings",
            post(handlers::client::create_booking).get(handlers::client::list_bookings),
        )
        .route("/client/bookings/{id}", get(handlers::client::get_booking))
        .route(
            "/client/bookings/{id}/cancel",
            post(handlers::client::cancel_booking),
        )
}

/// Owner namespace: machines, instances, booking decisions, dashboard
fn owner_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/owner/machines",
            get(handlers::owner::list_machines).post(handlers::owner::create_machine),
        )
        .route(
            "/owner/machines/{id}",
            put(handlers::owner::update_machine).delete(handlers::owner::delete_machine),
        )
        .route(
            "/owner/machines/{id}/instances",
            get(handlers::owner::list_instances).post(handlers::owner::add_instance),
        )
        .route(
            "/owner/machines/{id}/images/presign",
            post(handlers::owner::presign_image),
        )
        .route(
            "/owner/instances/{id}",
            put(handlers::owner::set_instance_active),
        )
        .route("/owner/bookings", get(handlers::owner::list_bookings))
        .route("/owner/bookings/{id}", get(handlers::owner::get_booking))
        .route(
            "/owner/bookings/{id}/approve",
            post(handlers::owner::approve_booking),
        )
        .route(
            "/owner/bookings/{id}/reject",
            post(handlers::owner::reject_booking),
        )
        .route(
            "/owner/bookings/{id}/send-back",
            post(handlers::owner::send_back_booking),
        )
        .route("/owner/dashboard", get(handlers::owner::dashboard))
}

/// Profile endpoints
fn profile_routes() -> Router<AppState> {
    Router::new().route(
        "/profile",
        get(handlers::profile::get_profile).put(handlers::profile::update_profile),
    )
}

/// Booking message thread, shared by both participants
fn message_routes() -> Router<AppState> {
    Router::new().route(
        "/bookings/{id}/messages",
        get(handlers::messages::list_messages).post(handlers::messages::send_message),
    )
}

/// Upload boundary: ticketed PUT plus public media reads
fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/uploads/{ticket}", put(handlers::upload::put_upload))
        .route("/media/{*path}", get(handlers::upload::get_media))
}

/// Health check endpoints (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/detailed", get(handlers::health::detailed_health))
}

/// Build CORS layer from configuration
fn build_cors_layer(state: &AppState) -> CorsLayer {
    use axum::http::{HeaderValue, Method};
    use tower_http::cors::Any;

    let cors_config = &state.config.server.cors;

    let mut cors = CorsLayer::new();

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Vec<Method> = cors_config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    cors = cors.allow_methods(methods);

    if cors_config.allowed_headers.contains(&"*".to_string()) {
        cors = cors.allow_headers(Any);
    }

    cors.max_age(std::time::Duration::from_secs(cors_config.max_age_seconds))
}
