//! Machine template repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use renthub_core::error::{AppError, ErrorKind};
use renthub_core::result::AppResult;
use renthub_core::types::pagination::{PageRequest, PageResponse};
use renthub_entity::machine::{CreateMachine, MachineTemplate, MachineWithStats, UpdateMachine};

/// Columns + joins shared by every stats-bearing machine query.
const STATS_SELECT: &str = "SELECT m.*, u.name AS owner_name, \
       COUNT(DISTINCT i.id) AS instance_count, \
       COUNT(DISTINCT i.id) FILTER (WHERE i.active) AS active_instance_count, \
       COUNT(DISTINCT b.id) AS booking_count \
     FROM machine_templates m \
     JOIN users u ON u.id = m.owner_id \
     LEFT JOIN machine_instances i ON i.template_id = m.id \
     LEFT JOIN bookings b ON b.template_id = m.id";

const STATS_GROUP: &str = "GROUP BY m.id, u.name";

/// Repository for machine template CRUD and catalog queries.
#[derive(Debug, Clone)]
pub struct MachineRepository {
    pool: PgPool,
}

impl MachineRepository {
    /// Create a new machine repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a template by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<MachineTemplate>> {
        sqlx::query_as::<_, MachineTemplate>("SELECT * FROM machine_templates WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find machine", e))
    }

    /// Find a template with owner name and instance/booking counters.
    pub async fn find_with_stats(&self, id: Uuid) -> AppResult<Option<MachineWithStats>> {
        let sql = format!("{STATS_SELECT} WHERE m.id = $1 {STATS_GROUP}");
        sqlx::query_as::<_, MachineWithStats>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find machine stats", e)
            })
    }

    /// List catalog entries with optional category and free-text filters.
    pub async fn list_catalog(
        &self,
        category: Option<&str>,
        search: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<MachineWithStats>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM machine_templates m \
             WHERE ($1::text IS NULL OR m.category = $1) \
               AND ($2::text IS NULL OR m.name ILIKE '%' || $2 || '%' \
                    OR m.description ILIKE '%' || $2 || '%')",
        )
        .bind(category)
        .bind(search)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count catalog", e))?;

        let sql = format!(
            "{STATS_SELECT} \
             WHERE ($1::text IS NULL OR m.category = $1) \
               AND ($2::text IS NULL OR m.name ILIKE '%' || $2 || '%' \
                    OR m.description ILIKE '%' || $2 || '%') \
             {STATS_GROUP} \
             ORDER BY m.created_at DESC LIMIT $3 OFFSET $4"
        );
        let items = sqlx::query_as::<_, MachineWithStats>(&sql)
            .bind(category)
            .bind(search)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list catalog", e)
            })?;

        Ok(PageResponse::new(
            items,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List all templates belonging to an owner, with counters.
    pub async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<MachineWithStats>> {
        let sql = format!("{STATS_SELECT} WHERE m.owner_id = $1 {STATS_GROUP} ORDER BY m.created_at DESC");
        sqlx::query_as::<_, MachineWithStats>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list owner machines", e)
            })
    }

    /// Create a new template.
    pub async fn create(&self, data: &CreateMachine) -> AppResult<MachineTemplate> {
        let specs = serde_json::to_value(&data.specs)?;
        sqlx::query_as::<_, MachineTemplate>(
            "INSERT INTO machine_templates (owner_id, name, code, description, category, price_per_hour_cents, specs) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(data.owner_id)
        .bind(&data.name)
        .bind(&data.code)
        .bind(&data.description)
        .bind(&data.category)
        .bind(data.price_per_hour_cents)
        .bind(specs)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(format!("Machine code '{}' is already in use", data.code))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create machine", e)
            }
        })
    }

    /// Update a template's editable fields.
    pub async fn update(&self, id: Uuid, data: &UpdateMachine) -> AppResult<MachineTemplate> {
        let specs = data.specs.as_ref().map(serde_json::to_value).transpose()?;
        sqlx::query_as::<_, MachineTemplate>(
            "UPDATE machine_templates SET \
               name = COALESCE($2, name), \
               description = COALESCE($3, description), \
               category = COALESCE($4, category), \
               price_per_hour_cents = COALESCE($5, price_per_hour_cents), \
               specs = COALESCE($6, specs), \
               updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.category)
        .bind(data.price_per_hour_cents)
        .bind(specs)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update machine", e))?
        .ok_or_else(|| AppError::not_found("Machine not found"))
    }

    /// Delete a template. Returns `false` if it did not exist.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM machine_templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete machine", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}

/// Whether the sqlx error is a PostgreSQL unique-constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    )
}
