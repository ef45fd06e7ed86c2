//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use renthub_entity::machine::MachineSpecs;
use renthub_entity::user::UserRole;

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name.
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    /// Email address.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Password; strength is checked by the auth policy.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Actor role for the new account.
    pub role: UserRole,
}

/// Sign-in request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token.
    pub refresh_token: String,
}

/// Profile update request. Email is read-only and deliberately absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    /// Display name.
    pub name: Option<String>,
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
}

/// Catalog listing query parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogQuery {
    /// Category filter.
    pub category: Option<String>,
    /// Free-text search over name and description.
    pub search: Option<String>,
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Items per page.
    pub page_size: Option<u64>,
}

/// New machine listing request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMachineRequest {
    /// Display name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Owner-assigned short code.
    #[validate(length(min = 1, max = 64))]
    pub code: String,
    /// Long description.
    pub description: Option<String>,
    /// Catalog category.
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    /// Rental price in integer cents per hour.
    #[validate(range(min = 0))]
    pub price_per_hour_cents: i64,
    /// Structured presentation specs.
    #[serde(default)]
    pub specs: MachineSpecs,
}

/// Machine update request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMachineRequest {
    /// New display name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New price in integer cents per hour.
    pub price_per_hour_cents: Option<i64>,
    /// Replacement specs.
    pub specs: Option<MachineSpecs>,
}

/// New instance registration request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddInstanceRequest {
    /// Unit code.
    #[validate(length(min = 1, max = 64))]
    pub code: String,
    /// Initial active flag.
    #[serde(default = "default_true")]
    pub active: bool,
}

/// Instance activation toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetInstanceActiveRequest {
    /// New active flag.
    pub active: bool,
}

/// Availability check request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    /// The machine template to check.
    pub template_id: Uuid,
    /// Desired rental start.
    pub start_time: DateTime<Utc>,
    /// Desired rental end (exclusive).
    pub end_time: DateTime<Utc>,
    /// Number of units wanted.
    pub requested_count: i64,
}

/// New booking request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    /// The machine template to book.
    pub template_id: Uuid,
    /// Rental start.
    pub start_time: DateTime<Utc>,
    /// Rental end (exclusive).
    pub end_time: DateTime<Utc>,
}

/// Owner booking list query parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct OwnerBookingsQuery {
    /// Status filter (wire string, e.g. `pending_renter_approval`).
    pub status: Option<String>,
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Items per page.
    pub page_size: Option<u64>,
}

/// Body for approve/cancel actions; the note is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// Optional note recorded on the booking thread.
    pub message: Option<String>,
}

/// Body for reject/send-back actions; the reason is mandatory.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReasonRequest {
    /// Reason recorded on the booking thread.
    #[validate(length(min = 1, message = "A reason is required"))]
    pub message: String,
}

/// New thread message.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendMessageRequest {
    /// Message body.
    #[validate(length(min = 1, max = 4000, message = "Message content is required"))]
    pub content: String,
}

/// Pre-signed image upload request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PresignImageRequest {
    /// Original file name.
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    /// Declared content type.
    #[validate(length(min = 1, max = 100))]
    pub content_type: String,
}

fn default_true() -> bool {
    true
}
