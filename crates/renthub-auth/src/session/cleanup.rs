//! Background task deleting expired and terminated session rows.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, error, info};

use renthub_core::config::session::SessionConfig;
use renthub_database::repositories::SessionRepository;

/// Periodic session-table sweeper.
#[derive(Debug, Clone)]
pub struct SessionCleanupTask {
    /// Session repository.
    session_repo: Arc<SessionRepository>,
    /// Session configuration.
    config: SessionConfig,
}

impl SessionCleanupTask {
    /// Creates a new cleanup task.
    pub fn new(session_repo: Arc<SessionRepository>, config: SessionConfig) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Runs the sweep loop until the shutdown channel flips to `true`.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut interval =
            tokio::time::interval(Duration::from_secs(self.config.cleanup_interval_seconds));
        info!(
            interval_seconds = self.config.cleanup_interval_seconds,
            "Session cleanup task started"
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.sweep_once().await;
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("Session cleanup task stopping");
                        break;
                    }
                }
            }
        }
    }

    /// Deletes rows past the retention window.
    async fn sweep_once(&self) {
        let cutoff = Utc::now() - chrono::Duration::hours(self.config.retention_hours as i64);
        match self.session_repo.cleanup_expired(cutoff).await {
            Ok(0) => debug!("Session cleanup: nothing to delete"),
            Ok(n) => info!(deleted = n, "Session cleanup: deleted stale sessions"),
            Err(e) => error!(error = %e, "Session cleanup failed"),
        }
    }
}
