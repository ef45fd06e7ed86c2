//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An authenticated session.
///
/// Token hashes are stored instead of the tokens themselves; the raw
/// JWTs exist only in the client's hands.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// Hash of the current access token.
    #[serde(skip_serializing)]
    pub token_hash: String,
    /// Hash of the current refresh token.
    #[serde(skip_serializing)]
    pub refresh_token_hash: String,
    /// IP address the session was created from.
    pub ip_address: String,
    /// User-Agent header at session creation.
    pub user_agent: Option<String>,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
    /// Last observed activity.
    pub last_activity: DateTime<Utc>,
    /// When the session was terminated, if it was.
    pub terminated_at: Option<DateTime<Utc>>,
    /// Why the session was terminated.
    pub terminated_reason: Option<String>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session is still usable right now.
    pub fn is_active(&self) -> bool {
        self.terminated_at.is_none() && self.expires_at > Utc::now()
    }
}

/// Data required to create a new session record.
///
/// The ID is generated by the caller so that JWT claims can reference
/// the session before the row exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    /// Pre-generated session identifier.
    pub id: Uuid,
    /// The owning user.
    pub user_id: Uuid,
    /// Hash of the access token.
    pub token_hash: String,
    /// Hash of the refresh token.
    pub refresh_token_hash: String,
    /// Originating IP address.
    pub ip_address: String,
    /// User-Agent header.
    pub user_agent: Option<String>,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}
