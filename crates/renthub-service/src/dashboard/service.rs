//! Owner dashboard assembly with caching.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use renthub_cache::{CacheManager, keys};
use renthub_core::error::AppError;
use renthub_core::traits::CacheProvider;
use renthub_database::repositories::{BookingRepository, MachineRepository};

use crate::context::RequestContext;

use super::aggregate::{
    self, OwnerTotals, RevenueBucket, StatusSlice, UtilizationEntry,
};

/// Cached dashboard TTL; any booking or machine mutation invalidates earlier.
const DASHBOARD_TTL: Duration = Duration::from_secs(60);

/// The assembled owner dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerDashboard {
    /// Header counters.
    pub totals: OwnerTotals,
    /// Trailing six months of revenue, oldest first.
    pub revenue_series: Vec<RevenueBucket>,
    /// Booking counts per status with display ratios.
    pub status_mix: Vec<StatusSlice>,
    /// Top-5 machines by instance utilization.
    pub utilization: Vec<UtilizationEntry>,
}

/// Assembles the owner dashboard from bookings and machine stats.
#[derive(Debug, Clone)]
pub struct DashboardService {
    /// Booking repository.
    booking_repo: Arc<BookingRepository>,
    /// Machine repository.
    machine_repo: Arc<MachineRepository>,
    /// Query cache.
    cache: Arc<CacheManager>,
}

impl DashboardService {
    /// Creates a new dashboard service.
    pub fn new(
        booking_repo: Arc<BookingRepository>,
        machine_repo: Arc<MachineRepository>,
        cache: Arc<CacheManager>,
    ) -> Self {
        Self {
            booking_repo,
            machine_repo,
            cache,
        }
    }

    /// Returns the owner's dashboard, cached until the next mutation.
    pub async fn owner_dashboard(&self, ctx: &RequestContext) -> Result<OwnerDashboard, AppError> {
        ctx.require_owner()?;

        let cache_key = keys::owner_dashboard(ctx.user_id);
        if let Some(cached) = self.cache.get_json::<OwnerDashboard>(&cache_key).await? {
            return Ok(cached);
        }

        let machines = self.machine_repo.list_by_owner(ctx.user_id).await?;
        let bookings = self.booking_repo.list_all_by_owner(ctx.user_id).await?;
        let now = Utc::now();

        let dashboard = OwnerDashboard {
            totals: aggregate::owner_totals(&machines, &bookings),
            revenue_series: aggregate::revenue_series(&bookings, now),
            status_mix: aggregate::status_mix(&bookings),
            utilization: aggregate::utilization_ranking(&machines),
        };

        self.cache
            .set_json(&cache_key, &dashboard, DASHBOARD_TTL)
            .await?;
        Ok(dashboard)
    }
}
