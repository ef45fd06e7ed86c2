//! Session repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use renthub_core::error::{AppError, ErrorKind};
use renthub_core::result::AppResult;
use renthub_entity::session::{CreateSession, Session};

/// Repository for session CRUD and lifecycle operations.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a session by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find session", e))
    }

    /// Create a new session.
    pub async fn create(&self, data: &CreateSession) -> AppResult<Session> {
        sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (id, user_id, token_hash, refresh_token_hash, ip_address, user_agent, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(data.id)
        .bind(data.user_id)
        .bind(&data.token_hash)
        .bind(&data.refresh_token_hash)
        .bind(&data.ip_address)
        .bind(&data.user_agent)
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create session", e))
    }

    /// Update the last-activity timestamp.
    pub async fn touch_activity(&self, session_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE sessions SET last_activity = NOW() WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update last activity", e)
            })?;
        Ok(())
    }

    /// Replace the refresh token hash after rotation.
    pub async fn update_refresh_token(&self, session_id: Uuid, new_hash: &str) -> AppResult<()> {
        sqlx::query("UPDATE sessions SET refresh_token_hash = $2 WHERE id = $1")
            .bind(session_id)
            .bind(new_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update refresh token", e)
            })?;
        Ok(())
    }

    /// Terminate a session. Errors if it is already terminated or missing.
    pub async fn terminate(&self, session_id: Uuid, reason: &str) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE sessions SET terminated_reason = $2, terminated_at = NOW() \
             WHERE id = $1 AND terminated_at IS NULL",
        )
        .bind(session_id)
        .bind(reason)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to terminate session", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Active session {session_id} not found"
            )));
        }
        Ok(())
    }

    /// Delete expired and terminated sessions older than the given cutoff.
    pub async fn cleanup_expired(&self, before: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM sessions WHERE (expires_at < $1) OR (terminated_at IS NOT NULL AND terminated_at < $1)",
        )
        .bind(before)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to cleanup sessions", e))?;

        Ok(result.rows_affected())
    }
}
