//! Booking entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::BookingStatus;

/// A request to reserve an instance of a machine template for a time range.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    /// Unique booking identifier.
    pub id: Uuid,
    /// The requested machine template.
    pub template_id: Uuid,
    /// The allocated unit; `None` until approval assigns one.
    pub machine_instance_id: Option<Uuid>,
    /// The requesting client.
    pub client_id: Uuid,
    /// Rental start.
    pub start_time: DateTime<Utc>,
    /// Rental end (exclusive).
    pub end_time: DateTime<Utc>,
    /// Current lifecycle status.
    pub status: BookingStatus,
    /// Price captured from the template at request time, in cents per hour.
    pub price_per_hour_cents: Option<i64>,
    /// When the booking was created.
    pub created_at: DateTime<Utc>,
    /// When the booking was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Rental duration in hours, clamped to a 1-hour minimum for billing.
    pub fn billable_hours(&self) -> f64 {
        let seconds = (self.end_time - self.start_time).num_seconds().max(0) as f64;
        (seconds / 3600.0).max(1.0)
    }

    /// Total value of the booking in cents; 0 when no price was captured.
    pub fn value_cents(&self) -> i64 {
        match self.price_per_hour_cents {
            Some(price) => (self.billable_hours() * price as f64).round() as i64,
            None => 0,
        }
    }
}

/// A booking joined with display fields for list views.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookingView {
    /// The booking row.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub booking: Booking,
    /// Client display name.
    pub client_name: String,
    /// Client email.
    pub client_email: String,
    /// Machine template name.
    pub machine_name: String,
    /// Allocated unit code, when an instance is assigned.
    pub instance_code: Option<String>,
}

/// Data required to create a new booking request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBooking {
    /// The requested template.
    pub template_id: Uuid,
    /// The requesting client.
    pub client_id: Uuid,
    /// Rental start.
    pub start_time: DateTime<Utc>,
    /// Rental end (exclusive).
    pub end_time: DateTime<Utc>,
    /// Price captured from the template, in cents per hour.
    pub price_per_hour_cents: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn booking(start: &str, end: &str, price: Option<i64>) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            template_id: Uuid::new_v4(),
            machine_instance_id: None,
            client_id: Uuid::new_v4(),
            start_time: start.parse().unwrap(),
            end_time: end.parse().unwrap(),
            status: BookingStatus::PendingRenterApproval,
            price_per_hour_cents: price,
            created_at: Utc.timestamp_opt(0, 0).unwrap(),
            updated_at: Utc.timestamp_opt(0, 0).unwrap(),
        }
    }

    #[test]
    fn test_two_hour_value() {
        let b = booking("2024-01-01T08:00:00Z", "2024-01-01T10:00:00Z", Some(500));
        assert_eq!(b.value_cents(), 1000);
    }

    #[test]
    fn test_sub_hour_clamped_to_one() {
        let b = booking("2024-01-01T08:00:00Z", "2024-01-01T08:20:00Z", Some(500));
        assert_eq!(b.billable_hours(), 1.0);
        assert_eq!(b.value_cents(), 500);
    }

    #[test]
    fn test_missing_price_contributes_zero() {
        let b = booking("2024-01-01T08:00:00Z", "2024-01-01T12:00:00Z", None);
        assert_eq!(b.value_cents(), 0);
    }
}
