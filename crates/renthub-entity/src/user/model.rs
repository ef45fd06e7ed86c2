//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;
use super::status::UserStatus;

/// A registered user of the RentHub marketplace.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Email address; unique, used for sign-in, read-only after registration.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Actor role (owner or client).
    pub role: UserRole,
    /// Account status.
    pub status: UserStatus,
    /// Phone number.
    pub phone: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// State / province.
    pub state: Option<String>,
    /// Postal code.
    pub zip_code: Option<String>,
    /// Profile image URL.
    pub image_url: Option<String>,
    /// Number of consecutive failed login attempts.
    pub failed_login_attempts: i32,
    /// Account locked until this time (if locked).
    pub locked_until: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Check if the user account is currently locked.
    pub fn is_locked(&self) -> bool {
        if self.status == UserStatus::Locked {
            if let Some(locked_until) = self.locked_until {
                return Utc::now() < locked_until;
            }
            return true;
        }
        false
    }

    /// Check if the user can sign in right now.
    pub fn can_login(&self) -> bool {
        self.status.can_login() && !self.is_locked()
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Actor role.
    pub role: UserRole,
}

/// Data for updating a user's editable profile fields.
///
/// `email` is deliberately absent: it is read-only after registration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfile {
    /// New display name.
    pub name: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// New street address.
    pub address: Option<String>,
    /// New city.
    pub city: Option<String>,
    /// New state / province.
    pub state: Option<String>,
    /// New postal code.
    pub zip_code: Option<String>,
    /// New profile image URL.
    pub image_url: Option<String>,
}
