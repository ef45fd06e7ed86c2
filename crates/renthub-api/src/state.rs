//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use renthub_auth::jwt::JwtDecoder;
use renthub_auth::session::SessionManager;
use renthub_cache::CacheManager;
use renthub_core::config::AppConfig;
use renthub_service::booking::BookingService;
use renthub_service::catalog::CatalogService;
use renthub_service::dashboard::DashboardService;
use renthub_service::machine::MachineService;
use renthub_service::profile::ProfileService;
use renthub_storage::StorageManager;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool
    pub db_pool: PgPool,
    /// Query cache
    pub cache: Arc<CacheManager>,
    /// Storage manager
    pub storage: Arc<StorageManager>,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Session lifecycle manager
    pub session_manager: Arc<SessionManager>,

    // ── Services ─────────────────────────────────────────────
    /// Booking lifecycle service
    pub booking_service: Arc<BookingService>,
    /// Public catalog service
    pub catalog_service: Arc<CatalogService>,
    /// Owner machine management service
    pub machine_service: Arc<MachineService>,
    /// Owner dashboard service
    pub dashboard_service: Arc<DashboardService>,
    /// Profile service
    pub profile_service: Arc<ProfileService>,
}
