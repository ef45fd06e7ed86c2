//! Machine template entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::specs::MachineSpecs;

/// A rentable equipment listing.
///
/// A template may have multiple physical instances tracked for
/// availability; bookings reference the template and are assigned a
/// concrete instance at approval time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MachineTemplate {
    /// Unique template identifier.
    pub id: Uuid,
    /// The owner who listed this machine.
    pub owner_id: Uuid,
    /// Display name.
    pub name: String,
    /// Owner-assigned short code, unique per owner.
    pub code: String,
    /// Long description.
    pub description: Option<String>,
    /// Catalog category.
    pub category: String,
    /// Rental price in integer cents per hour.
    pub price_per_hour_cents: i64,
    /// Structured presentation specs (JSONB).
    #[sqlx(json)]
    pub specs: MachineSpecs,
    /// Average client rating, when any ratings exist.
    pub average_rating: Option<f64>,
    /// When the template was created.
    pub created_at: DateTime<Utc>,
    /// When the template was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A machine template joined with its owner name and instance/booking counters.
///
/// The counters are SQL aggregates; they are never recomputed locally
/// except for the display utilization ratio.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MachineWithStats {
    /// The template row.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub template: MachineTemplate,
    /// Owner display name.
    pub owner_name: String,
    /// Total number of instances.
    pub instance_count: i64,
    /// Number of active (rentable) instances.
    pub active_instance_count: i64,
    /// Number of bookings ever requested against this template.
    pub booking_count: i64,
}

impl MachineWithStats {
    /// Instance utilization ratio in `[0, 1]`; 0 when there are no instances.
    pub fn utilization(&self) -> f64 {
        if self.instance_count == 0 {
            0.0
        } else {
            self.active_instance_count as f64 / self.instance_count as f64
        }
    }
}

/// Data required to create a new machine template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMachine {
    /// The listing owner.
    pub owner_id: Uuid,
    /// Display name.
    pub name: String,
    /// Owner-assigned short code.
    pub code: String,
    /// Long description.
    pub description: Option<String>,
    /// Catalog category.
    pub category: String,
    /// Rental price in integer cents per hour.
    pub price_per_hour_cents: i64,
    /// Structured presentation specs.
    pub specs: MachineSpecs,
}

/// Data for updating an existing machine template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMachine {
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
