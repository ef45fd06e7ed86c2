//! Booking message thread entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A free-text message exchanged between booking participants.
///
/// The thread is available regardless of booking status. Read queries
/// return ascending `created_at` order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookingMessage {
    /// Unique message identifier.
    pub id: Uuid,
    /// The booking this message belongs to.
    pub booking_id: Uuid,
    /// The user who sent the message.
    pub sender_id: Uuid,
    /// Message body.
    pub content: String,
    /// When the message was sent.
    pub created_at: DateTime<Utc>,
}

/// Data required to append a message to a booking thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMessage {
    /// Target booking.
    pub booking_id: Uuid,
    /// Sending user.
    pub sender_id: Uuid,
    /// Message body.
    pub content: String,
}
