//! Booking operations: availability, requests, lifecycle transitions,
//! and the message thread.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use renthub_cache::{CacheManager, keys};
use renthub_core::error::AppError;
use renthub_core::traits::CacheProvider;
use renthub_core::types::pagination::{PageRequest, PageResponse};
use renthub_database::repositories::{
    BookingRepository, InstanceRepository, MachineRepository,
};
use renthub_entity::booking::{
    Booking, BookingAction, BookingMessage, BookingStatus, BookingView, CreateBooking,
    CreateMessage,
};
use renthub_entity::machine::MachineTemplate;

use crate::context::RequestContext;

/// Cached booking-list TTL; mutations invalidate earlier.
const LIST_TTL: Duration = Duration::from_secs(30);

/// Input for an availability check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckAvailability {
    /// The machine template to check.
    pub template_id: Uuid,
    /// Desired rental start.
    pub start_time: DateTime<Utc>,
    /// Desired rental end (exclusive).
    pub end_time: DateTime<Utc>,
    /// Number of units wanted; must be positive.
    pub requested_count: i64,
}

/// Result of an availability check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResult {
    /// Whether the requested count can be served.
    pub available: bool,
    /// Units free in the requested range.
    pub available_count: i64,
    /// Projected cost for the requested units, in cents.
    pub total_cost_cents: i64,
    /// Human-readable shortfall, present when unavailable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Input for a new booking request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestBooking {
    /// The machine template to book.
    pub template_id: Uuid,
    /// Rental start.
    pub start_time: DateTime<Utc>,
    /// Rental end (exclusive).
    pub end_time: DateTime<Utc>,
}

/// Handles booking availability, requests, decisions, and messages.
#[derive(Debug, Clone)]
pub struct BookingService {
    /// Booking repository.
    booking_repo: Arc<BookingRepository>,
    /// Machine repository.
    machine_repo: Arc<MachineRepository>,
    /// Instance repository.
    instance_repo: Arc<InstanceRepository>,
    /// Query cache.
    cache: Arc<CacheManager>,
}

impl BookingService {
    /// Creates a new booking service.
    pub fn new(
        booking_repo: Arc<BookingRepository>,
        machine_repo: Arc<MachineRepository>,
        instance_repo: Arc<InstanceRepository>,
        cache: Arc<CacheManager>,
    ) -> Self {
        Self {
            booking_repo,
            machine_repo,
            instance_repo,
            cache,
        }
    }

    // ── Availability ───────────────────────────────────────────

    /// Checks whether `requested_count` units of a template are free in
    /// `[start_time, end_time)`.
    ///
    /// Capacity is the template's active instance count; demand is every
    /// booking in a capacity-blocking status overlapping the range.
    /// Never cached: the answer gates a booking action.
    pub async fn check_availability(
        &self,
        req: &CheckAvailability,
    ) -> Result<AvailabilityResult, AppError> {
        if req.requested_count < 1 {
            return Err(AppError::validation("requested_count must be a positive integer"));
        }
        validate_range(req.start_time, req.end_time)?;

        let template = self.load_template(req.template_id).await?;

        let active = self.instance_repo.count_active(req.template_id).await?;
        let overlapping = self
            .booking_repo
            .count_overlapping(req.template_id, req.start_time, req.end_time)
            .await?;

        let available_count = (active - overlapping).max(0);
        let available = available_count >= req.requested_count;

        let hours = billable_hours(req.start_time, req.end_time);
        let total_cost_cents =
            (hours * template.price_per_hour_cents as f64).round() as i64 * req.requested_count;

        Ok(AvailabilityResult {
            available,
            available_count,
            total_cost_cents,
            reason: if available {
                None
            } else {
                Some(format!(
                    "Only {available_count} of {} requested unit(s) free in that range",
                    req.requested_count
                ))
            },
        })
    }

    // ── Requests & decisions ───────────────────────────────────

    /// Creates a booking request in the initial pending status.
    ///
    /// Re-runs the availability check server-side; the client-side gate
    /// is advisory only.
    pub async fn request_booking(
        &self,
        ctx: &RequestContext,
        req: &RequestBooking,
    ) -> Result<Booking, AppError> {
        ctx.require_client()?;
        validate_range(req.start_time, req.end_time)?;

        let template = self.load_template(req.template_id).await?;

        let availability = self
            .check_availability(&CheckAvailability {
                template_id: req.template_id,
                start_time: req.start_time,
                end_time: req.end_time,
                requested_count: 1,
            })
            .await?;
        if !availability.available {
            return Err(AppError::conflict(
                availability
                    .reason
                    .unwrap_or_else(|| "Machine is not available in that range".to_string()),
            ));
        }

        let booking = self
            .booking_repo
            .create(&CreateBooking {
                template_id: template.id,
                client_id: ctx.user_id,
                start_time: req.start_time,
                end_time: req.end_time,
                price_per_hour_cents: Some(template.price_per_hour_cents),
            })
            .await?;

        info!(booking_id = %booking.id, template_id = %template.id, "Booking requested");
        self.invalidate_booking_reads(template.owner_id, ctx.user_id, template.id)
            .await;
        Ok(booking)
    }

    /// Owner approves a pending booking, allocating a free instance.
    pub async fn approve(
        &self,
        ctx: &RequestContext,
        booking_id: Uuid,
        note: Option<&str>,
    ) -> Result<BookingView, AppError> {
        self.decide(ctx, booking_id, BookingAction::Approve, note).await
    }

    /// Owner rejects a pending booking; `reason` must be non-empty.
    pub async fn reject(
        &self,
        ctx: &RequestContext,
        booking_id: Uuid,
        reason: &str,
    ) -> Result<BookingView, AppError> {
        self.decide(ctx, booking_id, BookingAction::Reject, Some(reason))
            .await
    }

    /// Owner sends a pending booking back to the client; `reason` must be
    /// non-empty.
    pub async fn send_back(
        &self,
        ctx: &RequestContext,
        booking_id: Uuid,
        reason: &str,
    ) -> Result<BookingView, AppError> {
        self.decide(ctx, booking_id, BookingAction::SendBack, Some(reason))
            .await
    }

    /// Client cancels their own booking.
    pub async fn cancel(
        &self,
        ctx: &RequestContext,
        booking_id: Uuid,
        note: Option<&str>,
    ) -> Result<BookingView, AppError> {
        self.decide(ctx, booking_id, BookingAction::Cancel, note).await
    }

    /// Shared transition path for all four named actions.
    ///
    /// The status update is conditional on the expected current status,
    /// so a duplicate submit observes zero affected rows and surfaces a
    /// conflict instead of double-applying.
    async fn decide(
        &self,
        ctx: &RequestContext,
        booking_id: Uuid,
        action: BookingAction,
        message: Option<&str>,
    ) -> Result<BookingView, AppError> {
        let booking = self.load_booking(booking_id).await?;
        let template = self.load_template(booking.template_id).await?;

        if action.is_owner_action() {
            ctx.require_owner()?;
            if template.owner_id != ctx.user_id {
                return Err(AppError::forbidden(
                    "Only the listing owner can decide on this booking",
                ));
            }
        } else {
            ctx.require_client()?;
            if booking.client_id != ctx.user_id {
                return Err(AppError::forbidden("Only the requesting client can cancel"));
            }
        }

        let message = message.map(str::trim).filter(|m| !m.is_empty());
        if action.requires_message() && message.is_none() {
            return Err(AppError::validation(format!(
                "A non-empty message is required to {} a booking",
                action.as_str()
            )));
        }

        let target = action.apply(booking.status)?;

        // Approval must land on a concrete free unit.
        let instance_id = if action == BookingAction::Approve {
            let instance = self
                .instance_repo
                .find_free_for_range(booking.template_id, booking.start_time, booking.end_time)
                .await?
                .ok_or_else(|| {
                    AppError::conflict("No free instance in the booking's time range")
                })?;
            Some(instance.id)
        } else {
            None
        };

        let transitioned = self
            .booking_repo
            .transition(booking_id, booking.status, target, instance_id)
            .await?;
        if !transitioned {
            return Err(AppError::conflict(
                "Booking was already decided by a concurrent request",
            ));
        }

        if let Some(content) = message {
            self.booking_repo
                .add_message(&CreateMessage {
                    booking_id,
                    sender_id: ctx.user_id,
                    content: content.to_string(),
                })
                .await?;
        }

        info!(
            booking_id = %booking_id,
            action = %action,
            from = %booking.status,
            to = %target,
            "Booking transitioned"
        );

        self.invalidate_booking_reads(template.owner_id, booking.client_id, template.id)
            .await;

        self.booking_repo
            .find_view_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found("Booking not found"))
    }

    // ── Reads ──────────────────────────────────────────────────

    /// A single booking with display fields, for either participant.
    pub async fn get_booking(
        &self,
        ctx: &RequestContext,
        booking_id: Uuid,
    ) -> Result<BookingView, AppError> {
        let view = self
            .booking_repo
            .find_view_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found("Booking not found"))?;
        self.require_participant(ctx, &view.booking).await?;
        Ok(view)
    }

    /// The client's own bookings, newest first.
    pub async fn list_client_bookings(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> Result<PageResponse<BookingView>, AppError> {
        ctx.require_client()?;

        let cache_key = keys::client_bookings(ctx.user_id, page.page);
        if let Some(cached) = self
            .cache
            .get_json::<PageResponse<BookingView>>(&cache_key)
            .await?
        {
            return Ok(cached);
        }

        let result = self.booking_repo.list_by_client(ctx.user_id, page).await?;
        self.cache.set_json(&cache_key, &result, LIST_TTL).await?;
        Ok(result)
    }

    /// Bookings against the owner's templates, optionally filtered by status.
    pub async fn list_owner_bookings(
        &self,
        ctx: &RequestContext,
        status: Option<BookingStatus>,
        page: &PageRequest,
    ) -> Result<PageResponse<BookingView>, AppError> {
        ctx.require_owner()?;

        let cache_key =
            keys::owner_bookings(ctx.user_id, status.map(BookingStatus::as_str), page.page);
        if let Some(cached) = self
            .cache
            .get_json::<PageResponse<BookingView>>(&cache_key)
            .await?
        {
            return Ok(cached);
        }

        let result = self
            .booking_repo
            .list_by_owner(ctx.user_id, status, page)
            .await?;
        self.cache.set_json(&cache_key, &result, LIST_TTL).await?;
        Ok(result)
    }

    // ── Message thread ─────────────────────────────────────────

    /// Appends a message to the thread. Available to both participants
    /// regardless of booking status.
    pub async fn send_message(
        &self,
        ctx: &RequestContext,
        booking_id: Uuid,
        content: &str,
    ) -> Result<BookingMessage, AppError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::validation("Message content cannot be empty"));
        }

        let booking = self.load_booking(booking_id).await?;
        self.require_participant(ctx, &booking).await?;

        self.booking_repo
            .add_message(&CreateMessage {
                booking_id,
                sender_id: ctx.user_id,
                content: content.to_string(),
            })
            .await
    }

    /// The thread in ascending chronological order.
    pub async fn list_messages(
        &self,
        ctx: &RequestContext,
        booking_id: Uuid,
    ) -> Result<Vec<BookingMessage>, AppError> {
        let booking = self.load_booking(booking_id).await?;
        self.require_participant(ctx, &booking).await?;
        self.booking_repo.list_messages(booking_id).await
    }

    // ── Internals ──────────────────────────────────────────────

    async fn load_booking(&self, booking_id: Uuid) -> Result<Booking, AppError> {
        self.booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found("Booking not found"))
    }

    async fn load_template(&self, template_id: Uuid) -> Result<MachineTemplate, AppError> {
        self.machine_repo
            .find_by_id(template_id)
            .await?
            .ok_or_else(|| AppError::not_found("Machine not found"))
    }

    /// Errors unless the actor is the booking's client or the template's owner.
    async fn require_participant(
        &self,
        ctx: &RequestContext,
        booking: &Booking,
    ) -> Result<(), AppError> {
        if booking.client_id == ctx.user_id {
            return Ok(());
        }
        let template = self.load_template(booking.template_id).await?;
        if template.owner_id == ctx.user_id {
            return Ok(());
        }
        Err(AppError::forbidden("Not a participant of this booking"))
    }

    /// Drops every cached read a booking mutation can make stale.
    async fn invalidate_booking_reads(&self, owner_id: Uuid, client_id: Uuid, template_id: Uuid) {
        let _ = self
            .cache
            .delete_pattern(&keys::owner_bookings_pattern(owner_id))
            .await;
        let _ = self
            .cache
            .delete_pattern(&keys::client_bookings_pattern(client_id))
            .await;
        let _ = self.cache.delete(&keys::owner_dashboard(owner_id)).await;
        let _ = self.cache.delete(&keys::machine_detail(template_id)).await;
        let _ = self.cache.delete_pattern(&keys::catalog_pattern()).await;
    }
}

/// Billable duration in hours, clamped to a 1-hour minimum.
fn billable_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let seconds = (end - start).num_seconds().max(0) as f64;
    (seconds / 3600.0).max(1.0)
}

/// Errors unless `start < end`.
fn validate_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), AppError> {
    if start >= end {
        return Err(AppError::validation("start_time must be before end_time"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_billable_hours_clamped() {
        let start: DateTime<Utc> = "2024-01-01T08:00:00Z".parse().unwrap();
        let end: DateTime<Utc> = "2024-01-01T08:30:00Z".parse().unwrap();
        assert_eq!(billable_hours(start, end), 1.0);

        let end: DateTime<Utc> = "2024-01-01T10:00:00Z".parse().unwrap();
        assert_eq!(billable_hours(start, end), 2.0);
    }

    #[test]
    fn test_validate_range() {
        let start: DateTime<Utc> = "2024-01-01T08:00:00Z".parse().unwrap();
        let end: DateTime<Utc> = "2024-01-01T10:00:00Z".parse().unwrap();
        assert!(validate_range(start, end).is_ok());
        assert!(validate_range(end, start).is_err());
        assert!(validate_range(start, start).is_err());
    }
}
