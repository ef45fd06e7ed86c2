//! Booking repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use renthub_core::error::{AppError, ErrorKind};
use renthub_core::result::AppResult;
use renthub_core::types::pagination::{PageRequest, PageResponse};
use renthub_entity::booking::{
    Booking, BookingMessage, BookingStatus, BookingView, CreateBooking, CreateMessage,
};

/// Columns + joins shared by every view-shaped booking query.
const VIEW_SELECT: &str = "SELECT b.*, c.name AS client_name, c.email AS client_email, \
       m.name AS machine_name, i.code AS instance_code \
     FROM bookings b \
     JOIN users c ON c.id = b.client_id \
     JOIN machine_templates m ON m.id = b.template_id \
     LEFT JOIN machine_instances i ON i.id = b.machine_instance_id";

/// Repository for booking CRUD, lifecycle transitions, and the message thread.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// Create a new booking repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a booking by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find booking", e))
    }

    /// Find a booking with display fields by ID.
    pub async fn find_view_by_id(&self, id: Uuid) -> AppResult<Option<BookingView>> {
        let sql = format!("{VIEW_SELECT} WHERE b.id = $1");
        sqlx::query_as::<_, BookingView>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find booking view", e)
            })
    }

    /// List a client's bookings, newest first.
    pub async fn list_by_client(
        &self,
        client_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<BookingView>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE client_id = $1")
            .bind(client_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count client bookings", e)
            })?;

        let sql = format!(
            "{VIEW_SELECT} WHERE b.client_id = $1 \
             ORDER BY b.created_at DESC LIMIT $2 OFFSET $3"
        );
        let items = sqlx::query_as::<_, BookingView>(&sql)
            .bind(client_id)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list client bookings", e)
            })?;

        Ok(PageResponse::new(
            items,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List bookings against an owner's templates, newest first.
    pub async fn list_by_owner(
        &self,
        owner_id: Uuid,
        status: Option<BookingStatus>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<BookingView>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings b \
             JOIN machine_templates m ON m.id = b.template_id \
             WHERE m.owner_id = $1 AND ($2::booking_status IS NULL OR b.status = $2)",
        )
        .bind(owner_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count owner bookings", e)
        })?;

        let sql = format!(
            "{VIEW_SELECT} WHERE m.owner_id = $1 \
               AND ($2::booking_status IS NULL OR b.status = $2) \
             ORDER BY b.created_at DESC LIMIT $3 OFFSET $4"
        );
        let items = sqlx::query_as::<_, BookingView>(&sql)
            .bind(owner_id)
            .bind(status)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list owner bookings", e)
            })?;

        Ok(PageResponse::new(
            items,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List every booking against an owner's templates (dashboard input).
    pub async fn list_all_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(
            "SELECT b.* FROM bookings b \
             JOIN machine_templates m ON m.id = b.template_id \
             WHERE m.owner_id = $1 ORDER BY b.start_time ASC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list owner bookings", e)
        })
    }

    /// Count bookings of a template in capacity-blocking statuses whose
    /// range overlaps `[start, end)`.
    pub async fn count_overlapping(
        &self,
        template_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings \
             WHERE template_id = $1 \
               AND status IN ('pending_renter_approval', 'approved_by_renter') \
               AND start_time < $3 AND end_time > $2",
        )
        .bind(template_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count overlapping bookings", e)
        })?;
        Ok(count)
    }

    /// Create a new booking request in the initial status.
    pub async fn create(&self, data: &CreateBooking) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (template_id, client_id, start_time, end_time, status, price_per_hour_cents) \
             VALUES ($1, $2, $3, $4, 'pending_renter_approval', $5) RETURNING *",
        )
        .bind(data.template_id)
        .bind(data.client_id)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(data.price_per_hour_cents)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create booking", e))
    }

    /// Conditionally transition a booking from `expected` to `target`.
    ///
    /// Returns `false` when the booking was not in the expected status —
    /// a duplicate submit or a concurrent writer got there first. The
    /// instance assignment travels with the same statement so approval is
    /// atomic.
    pub async fn transition(
        &self,
        id: Uuid,
        expected: BookingStatus,
        target: BookingStatus,
        instance_id: Option<Uuid>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE bookings SET status = $3, \
               machine_instance_id = COALESCE($4, machine_instance_id), \
               updated_at = NOW() \
             WHERE id = $1 AND status = $2",
        )
        .bind(id)
        .bind(expected)
        .bind(target)
        .bind(instance_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to transition booking", e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    /// Append a message to a booking thread.
    pub async fn add_message(&self, data: &CreateMessage) -> AppResult<BookingMessage> {
        sqlx::query_as::<_, BookingMessage>(
            "INSERT INTO booking_messages (booking_id, sender_id, content) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(data.booking_id)
        .bind(data.sender_id)
        .bind(&data.content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to add message", e))
    }

    /// List a booking's messages in ascending chronological order.
    pub async fn list_messages(&self, booking_id: Uuid) -> AppResult<Vec<BookingMessage>> {
        sqlx::query_as::<_, BookingMessage>(
            "SELECT * FROM booking_messages WHERE booking_id = $1 ORDER BY created_at ASC",
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list messages", e))
    }
}
