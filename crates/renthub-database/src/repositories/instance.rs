//! Machine instance repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use renthub_core::error::{AppError, ErrorKind};
use renthub_core::result::AppResult;
use renthub_entity::machine::{CreateInstance, MachineInstance};

/// Repository for machine instance CRUD and allocation queries.
#[derive(Debug, Clone)]
pub struct InstanceRepository {
    pool: PgPool,
}

impl InstanceRepository {
    /// Create a new instance repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an instance by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<MachineInstance>> {
        sqlx::query_as::<_, MachineInstance>("SELECT * FROM machine_instances WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find instance", e))
    }

    /// List all instances of a template.
    pub async fn list_by_template(&self, template_id: Uuid) -> AppResult<Vec<MachineInstance>> {
        sqlx::query_as::<_, MachineInstance>(
            "SELECT * FROM machine_instances WHERE template_id = $1 ORDER BY code ASC",
        )
        .bind(template_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list instances", e))
    }

    /// Count active instances of a template.
    pub async fn count_active(&self, template_id: Uuid) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM machine_instances WHERE template_id = $1 AND active",
        )
        .bind(template_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count active instances", e)
        })?;
        Ok(count)
    }

    /// Find an active instance of a template with no approved booking
    /// overlapping `[start, end)`. Lowest code wins, so allocation is
    /// deterministic.
    pub async fn find_free_for_range(
        &self,
        template_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Option<MachineInstance>> {
        sqlx::query_as::<_, MachineInstance>(
            "SELECT i.* FROM machine_instances i \
             WHERE i.template_id = $1 AND i.active \
               AND NOT EXISTS ( \
                 SELECT 1 FROM bookings b \
                 WHERE b.machine_instance_id = i.id \
                   AND b.status = 'approved_by_renter' \
                   AND b.start_time < $3 AND b.end_time > $2) \
             ORDER BY i.code ASC LIMIT 1",
        )
        .bind(template_id)
        .bind(start)
        .bind(end)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find free instance", e)
        })
    }

    /// Register a new instance.
    pub async fn create(&self, data: &CreateInstance) -> AppResult<MachineInstance> {
        sqlx::query_as::<_, MachineInstance>(
            "INSERT INTO machine_instances (template_id, code, active) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(data.template_id)
        .bind(&data.code)
        .bind(data.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create instance", e))
    }

    /// Set the active flag of an instance.
    pub async fn set_active(&self, id: Uuid, active: bool) -> AppResult<MachineInstance> {
        sqlx::query_as::<_, MachineInstance>(
            "UPDATE machine_instances SET active = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update instance", e))?
        .ok_or_else(|| AppError::not_found("Instance not found"))
    }
}
