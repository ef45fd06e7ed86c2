//! Machine instance entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A concrete, schedulable unit of a machine template.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MachineInstance {
    /// Unique instance identifier.
    pub id: Uuid,
    /// The template this unit belongs to.
    pub template_id: Uuid,
    /// Owner-assigned unit code (serial, fleet number).
    pub code: String,
    /// Whether the unit is currently rentable.
    pub active: bool,
    /// When the instance was created.
    pub created_at: DateTime<Utc>,
    /// When the instance was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to register a new instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInstance {
    /// The owning template.
    pub template_id: Uuid,
    /// Unit code.
    pub code: String,
    /// Initial active flag.
    pub active: bool,
}
