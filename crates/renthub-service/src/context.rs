//! Request context carrying the authenticated user and session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use renthub_core::AppError;
use renthub_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Extracted by middleware and passed into service methods so that
/// every operation knows *who* is acting and from *which* session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The current session ID.
    pub session_id: Uuid,
    /// The user's role at the time the JWT was issued.
    pub role: UserRole,
    /// The user's email (convenience field from JWT claims).
    pub email: String,
    /// The user's display name (convenience field from JWT claims).
    pub name: String,
    /// IP address of the request origin.
    pub ip_address: String,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(
        user_id: Uuid,
        session_id: Uuid,
        role: UserRole,
        email: String,
        name: String,
        ip_address: String,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            user_id,
            session_id,
            role,
            email,
            name,
            ip_address,
            user_agent,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the current user is an owner.
    pub fn is_owner(&self) -> bool {
        matches!(self.role, UserRole::Owner)
    }

    /// Returns whether the current user is a client.
    pub fn is_client(&self) -> bool {
        matches!(self.role, UserRole::Client)
    }

    /// Errors unless the current user is an owner.
    pub fn require_owner(&self) -> Result<(), AppError> {
        if self.is_owner() {
            Ok(())
        } else {
            Err(AppError::forbidden("This operation requires an owner account"))
        }
    }

    /// Errors unless the current user is a client.
    pub fn require_client(&self) -> Result<(), AppError> {
        if self.is_client() {
            Ok(())
        } else {
            Err(AppError::forbidden("This operation requires a client account"))
        }
    }
}
