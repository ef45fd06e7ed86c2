//! Typed JWT claims.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use renthub_entity::user::UserRole;

/// Distinguishes access from refresh tokens so one cannot stand in for
/// the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived token presented on every request.
    Access,
    /// Long-lived token exchanged for new access tokens.
    Refresh,
}

/// Claims carried in every RentHub JWT.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: Uuid,
    /// The session this token belongs to.
    pub sid: Uuid,
    /// Actor role at issue time.
    pub role: UserRole,
    /// User email at issue time.
    pub email: String,
    /// User display name at issue time.
    pub name: String,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
    /// Unique token ID, used by the blocklist.
    pub jti: Uuid,
    /// Access or refresh.
    pub token_type: TokenType,
}

impl Claims {
    /// The user this token was issued to.
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    /// The session this token belongs to.
    pub fn session_id(&self) -> Uuid {
        self.sid
    }

    /// Seconds until expiry; 0 when already expired.
    pub fn remaining_ttl_seconds(&self) -> u64 {
        (self.exp - Utc::now().timestamp()).max(0) as u64
    }
}
