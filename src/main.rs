//! RentHub Server — Equipment Rental Marketplace
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use renthub_core::config::AppConfig;
use renthub_core::error::AppError;

#[tokio::main]
async fn main() {
    let env = std::env::var("RENTHUB_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting RentHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    tracing::info!("Connecting to database...");
    let db_pool = renthub_database::connection::create_pool(&config.database).await?;
    renthub_database::migration::run_migrations(&db_pool).await?;

    // ── Step 2: Initialize cache ─────────────────────────────────
    tracing::info!("Initializing cache (provider: {})...", config.cache.provider);
    let cache = Arc::new(renthub_cache::CacheManager::new(&config.cache).await?);

    // ── Step 3: Initialize storage ───────────────────────────────
    tracing::info!("Initializing storage (provider: {})...", config.storage.provider);
    let storage = Arc::new(
        renthub_storage::StorageManager::new(&config.storage, &config.auth.jwt_secret).await?,
    );

    // ── Step 4: Initialize repositories ──────────────────────────
    let user_repo = Arc::new(renthub_database::repositories::UserRepository::new(
        db_pool.clone(),
    ));
    let session_repo = Arc::new(renthub_database::repositories::SessionRepository::new(
        db_pool.clone(),
    ));
    let machine_repo = Arc::new(renthub_database::repositories::MachineRepository::new(
        db_pool.clone(),
    ));
    let instance_repo = Arc::new(renthub_database::repositories::InstanceRepository::new(
        db_pool.clone(),
    ));
    let booking_repo = Arc::new(renthub_database::repositories::BookingRepository::new(
        db_pool.clone(),
    ));

    // ── Step 5: Initialize auth system ───────────────────────────
    tracing::info!("Initializing authentication system...");
    let password_hasher = Arc::new(renthub_auth::PasswordHasher::new());
    let jwt_encoder = Arc::new(renthub_auth::JwtEncoder::new(&config.auth));
    let jwt_decoder = Arc::new(renthub_auth::JwtDecoder::new(
        &config.auth,
        Arc::clone(&cache),
    ));
    let session_manager = Arc::new(renthub_auth::SessionManager::new(
        Arc::clone(&jwt_encoder),
        Arc::clone(&jwt_decoder),
        Arc::clone(&session_repo),
        Arc::clone(&user_repo),
        Arc::clone(&password_hasher),
        config.auth.clone(),
        config.session.clone(),
    ));

    // ── Step 6: Initialize services ──────────────────────────────
    tracing::info!("Initializing services...");
    let booking_service = Arc::new(renthub_service::booking::BookingService::new(
        Arc::clone(&booking_repo),
        Arc::clone(&machine_repo),
        Arc::clone(&instance_repo),
        Arc::clone(&cache),
    ));
    let catalog_service = Arc::new(renthub_service::catalog::CatalogService::new(
        Arc::clone(&machine_repo),
        Arc::clone(&cache),
    ));
    let machine_service = Arc::new(renthub_service::machine::MachineService::new(
        Arc::clone(&machine_repo),
        Arc::clone(&instance_repo),
        Arc::clone(&storage),
        Arc::clone(&cache),
    ));
    let dashboard_service = Arc::new(renthub_service::dashboard::DashboardService::new(
        Arc::clone(&booking_repo),
        Arc::clone(&machine_repo),
        Arc::clone(&cache),
    ));
    let profile_service = Arc::new(renthub_service::profile::ProfileService::new(Arc::clone(
        &user_repo,
    )));

    // ── Step 7: Shutdown channel + session cleanup task ──────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let cleanup_task = renthub_auth::session::SessionCleanupTask::new(
        Arc::clone(&session_repo),
        config.session.clone(),
    );
    let cleanup_handle = tokio::spawn(cleanup_task.run(shutdown_rx));

    // ── Step 8: Build and start HTTP server ──────────────────────
    let app_state = renthub_api::AppState {
        config: Arc::new(config.clone()),
        db_pool: db_pool.clone(),
        cache: Arc::clone(&cache),
        storage: Arc::clone(&storage),
        jwt_decoder: Arc::clone(&jwt_decoder),
        session_manager: Arc::clone(&session_manager),
        booking_service,
        catalog_service,
        machine_service,
        dashboard_service,
        profile_service,
    };

    let app = renthub_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("RentHub server listening on {}", addr);

    // ── Step 9: Graceful shutdown ────────────────────────────────
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 10: Wait for background tasks ───────────────────────
    tracing::info!("Waiting for background tasks to complete...");
    let _ = tokio::time::timeout(std::time::Duration::from_secs(10), cleanup_handle).await;

    tracing::info!("RentHub server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
