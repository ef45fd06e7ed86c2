//! Pure dashboard aggregation functions.
//!
//! Everything in this module is a pure function of its inputs (booking
//! list, machine list, reference time) with no hidden state, so the
//! derivations are unit-testable in isolation from storage and HTTP.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use renthub_entity::booking::{Booking, BookingStatus};
use renthub_entity::machine::MachineWithStats;

/// Number of months in the revenue series, current month included.
const REVENUE_MONTHS: usize = 6;

/// Maximum entries in the utilization ranking.
const UTILIZATION_TOP: usize = 5;

const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One month of the revenue series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueBucket {
    /// Short month name (`"Jan"` .. `"Dec"`).
    pub label: String,
    /// Calendar year of the bucket.
    pub year: i32,
    /// Calendar month of the bucket (1-12).
    pub month: u32,
    /// Summed booking value in cents.
    pub total_cents: i64,
}

/// One status group of the status mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSlice {
    /// The booking status.
    pub status: BookingStatus,
    /// Number of bookings in this status.
    pub count: u64,
    /// Display ratio in `[0, 100]`, normalized against the largest group.
    pub ratio: f64,
}

/// One machine of the utilization ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationEntry {
    /// The machine template.
    pub template_id: Uuid,
    /// Machine display name.
    pub name: String,
    /// Active instance count.
    pub active: i64,
    /// Total instance count.
    pub total: i64,
    /// `active/total` in `[0, 1]`; 0 when there are no instances.
    pub ratio: f64,
}

/// Aggregate owner counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerTotals {
    /// Number of listed machine templates.
    pub total_machines: u64,
    /// Number of approved bookings.
    pub active_bookings: u64,
    /// Number of bookings awaiting a decision.
    pub pending_bookings: u64,
    /// Summed value of approved bookings in cents.
    pub total_revenue_cents: i64,
}

/// Revenue for the trailing six calendar months, oldest first.
///
/// A booking lands in the bucket whose calendar month contains its
/// `start_time`; only approved bookings contribute. Value is
/// `max(1, duration_hours) * price_per_hour`, 0 when no price was
/// captured.
pub fn revenue_series(bookings: &[Booking], now: DateTime<Utc>) -> Vec<RevenueBucket> {
    let mut buckets: Vec<RevenueBucket> = (0..REVENUE_MONTHS)
        .rev()
        .map(|back| {
            let (year, month) = shift_month(now.year(), now.month(), back as i32);
            RevenueBucket {
                label: MONTH_ABBREV[(month - 1) as usize].to_string(),
                year,
                month,
                total_cents: 0,
            }
        })
        .collect();

    for booking in bookings {
        if !booking.status.is_revenue_bearing() {
            continue;
        }
        let (y, m) = (booking.start_time.year(), booking.start_time.month());
        if let Some(bucket) = buckets.iter_mut().find(|b| b.year == y && b.month == m) {
            bucket.total_cents += booking.value_cents();
        }
    }

    buckets
}

/// Booking counts per status, with each count normalized against the
/// maximum to a 0-100 display ratio. Empty input yields an empty vector.
pub fn status_mix(bookings: &[Booking]) -> Vec<StatusSlice> {
    let mut counts: Vec<(BookingStatus, u64)> = Vec::new();
    for booking in bookings {
        match counts.iter_mut().find(|(s, _)| *s == booking.status) {
            Some((_, count)) => *count += 1,
            None => counts.push((booking.status, 1)),
        }
    }

    let max = counts.iter().map(|(_, c)| *c).max().unwrap_or(0);
    if max == 0 {
        return Vec::new();
    }

    let mut slices: Vec<StatusSlice> = counts
        .into_iter()
        .map(|(status, count)| StatusSlice {
            status,
            count,
            ratio: count as f64 / max as f64 * 100.0,
        })
        .collect();

    // Largest groups first; status string breaks ties deterministically.
    slices.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.status.as_str().cmp(b.status.as_str()))
    });
    slices
}

/// Top machines by `active/total` instance ratio, descending, at most
/// five entries. Machines with no instances rank with ratio 0.
pub fn utilization_ranking(machines: &[MachineWithStats]) -> Vec<UtilizationEntry> {
    let mut entries: Vec<UtilizationEntry> = machines
        .iter()
        .map(|m| UtilizationEntry {
            template_id: m.template.id,
            name: m.template.name.clone(),
            active: m.active_instance_count,
            total: m.instance_count,
            ratio: m.utilization(),
        })
        .collect();

    // Stable sort keeps the input order for ties.
    entries.sort_by(|a, b| b.ratio.partial_cmp(&a.ratio).unwrap_or(std::cmp::Ordering::Equal));
    entries.truncate(UTILIZATION_TOP);
    entries
}

/// Aggregate counters for the owner dashboard header.
pub fn owner_totals(machines: &[MachineWithStats], bookings: &[Booking]) -> OwnerTotals {
    let active = bookings
        .iter()
        .filter(|b| b.status == BookingStatus::ApprovedByRenter)
        .count() as u64;
    let pending = bookings
        .iter()
        .filter(|b| b.status == BookingStatus::PendingRenterApproval)
        .count() as u64;
    let revenue = bookings
        .iter()
        .filter(|b| b.status.is_revenue_bearing())
        .map(Booking::value_cents)
        .sum();

    OwnerTotals {
        total_machines: machines.len() as u64,
        active_bookings: active,
        pending_bookings: pending,
        total_revenue_cents: revenue,
    }
}

/// Walk `back` months backwards from `(year, month)`.
fn shift_month(year: i32, month: u32, back: i32) -> (i32, u32) {
    let mut y = year;
    let mut m = month as i32 - back;
    while m <= 0 {
        m += 12;
        y -= 1;
    }
    (y, m as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use renthub_entity::machine::{MachineSpecs, MachineTemplate};

    fn booking(start: &str, end: &str, price: Option<i64>, status: BookingStatus) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            template_id: Uuid::new_v4(),
            machine_instance_id: None,
            client_id: Uuid::new_v4(),
            start_time: start.parse().unwrap(),
            end_time: end.parse().unwrap(),
            status,
            price_per_hour_cents: price,
            created_at: Utc.timestamp_opt(0, 0).unwrap(),
            updated_at: Utc.timestamp_opt(0, 0).unwrap(),
        }
    }

    fn machine(name: &str, active: i64, total: i64) -> MachineWithStats {
        MachineWithStats {
            template: MachineTemplate {
                id: Uuid::new_v4(),
                owner_id: Uuid::new_v4(),
                name: name.to_string(),
                code: name.to_uppercase(),
                description: None,
                category: "earthmoving".to_string(),
                price_per_hour_cents: 10_000,
                specs: MachineSpecs::default(),
                average_rating: None,
                created_at: Utc.timestamp_opt(0, 0).unwrap(),
                updated_at: Utc.timestamp_opt(0, 0).unwrap(),
            },
            owner_name: "Acme Rentals".to_string(),
            instance_count: total,
            active_instance_count: active,
            booking_count: 0,
        }
    }

    fn now() -> DateTime<Utc> {
        "2024-06-15T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_revenue_series_has_six_ordered_buckets() {
        let series = revenue_series(&[], now());
        assert_eq!(series.len(), 6);
        let labels: Vec<&str> = series.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Jan", "Feb", "Mar", "Apr", "May", "Jun"]);
        assert!(series.iter().all(|b| b.total_cents == 0));
    }

    #[test]
    fn test_revenue_series_crosses_year_boundary() {
        let now: DateTime<Utc> = "2024-02-10T00:00:00Z".parse().unwrap();
        let series = revenue_series(&[], now);
        let labels: Vec<&str> = series.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Sep", "Oct", "Nov", "Dec", "Jan", "Feb"]);
        assert_eq!(series[0].year, 2023);
        assert_eq!(series[5].year, 2024);
    }

    #[test]
    fn test_revenue_buckets_by_start_month() {
        let bookings = vec![
            booking(
                "2024-06-01T08:00:00Z",
                "2024-06-01T10:00:00Z",
                Some(500),
                BookingStatus::ApprovedByRenter,
            ),
            booking(
                "2024-05-20T08:00:00Z",
                "2024-05-20T11:00:00Z",
                Some(1000),
                BookingStatus::ApprovedByRenter,
            ),
            // Pending bookings carry no revenue.
            booking(
                "2024-06-02T08:00:00Z",
                "2024-06-02T18:00:00Z",
                Some(9999),
                BookingStatus::PendingRenterApproval,
            ),
            // Outside the window.
            booking(
                "2023-06-01T08:00:00Z",
                "2023-06-01T10:00:00Z",
                Some(500),
                BookingStatus::ApprovedByRenter,
            ),
        ];

        let series = revenue_series(&bookings, now());
        assert_eq!(series[5].total_cents, 1000); // Jun: 2h * 500
        assert_eq!(series[4].total_cents, 3000); // May: 3h * 1000
        assert_eq!(series[..4].iter().map(|b| b.total_cents).sum::<i64>(), 0);
    }

    #[test]
    fn test_revenue_sub_hour_clamped() {
        let bookings = vec![booking(
            "2024-06-01T08:00:00Z",
            "2024-06-01T08:15:00Z",
            Some(800),
            BookingStatus::ApprovedByRenter,
        )];
        let series = revenue_series(&bookings, now());
        assert_eq!(series[5].total_cents, 800);
    }

    #[test]
    fn test_revenue_missing_price_is_zero() {
        let bookings = vec![booking(
            "2024-06-01T08:00:00Z",
            "2024-06-01T12:00:00Z",
            None,
            BookingStatus::ApprovedByRenter,
        )];
        let series = revenue_series(&bookings, now());
        assert_eq!(series[5].total_cents, 0);
    }

    #[test]
    fn test_status_mix_ratios() {
        let bookings = vec![
            booking("2024-06-01T08:00:00Z", "2024-06-01T10:00:00Z", None, BookingStatus::ApprovedByRenter),
            booking("2024-06-02T08:00:00Z", "2024-06-02T10:00:00Z", None, BookingStatus::ApprovedByRenter),
            booking("2024-06-03T08:00:00Z", "2024-06-03T10:00:00Z", None, BookingStatus::ApprovedByRenter),
            booking("2024-06-04T08:00:00Z", "2024-06-04T10:00:00Z", None, BookingStatus::PendingRenterApproval),
        ];

        let mix = status_mix(&bookings);
        assert_eq!(mix.len(), 2);
        assert_eq!(mix[0].status, BookingStatus::ApprovedByRenter);
        assert_eq!(mix[0].ratio, 100.0);
        assert!(mix.iter().all(|s| (0.0..=100.0).contains(&s.ratio)));
        let pending = mix.iter().find(|s| s.status == BookingStatus::PendingRenterApproval).unwrap();
        assert!((pending.ratio - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_status_mix_empty_input() {
        assert!(status_mix(&[]).is_empty());
    }

    #[test]
    fn test_utilization_ranking_top_five_descending() {
        let machines = vec![
            machine("loader", 1, 4),
            machine("dozer", 3, 3),
            machine("crane", 0, 0),
            machine("grader", 2, 4),
            machine("paver", 1, 2),
            machine("roller", 1, 1),
        ];

        let ranking = utilization_ranking(&machines);
        assert_eq!(ranking.len(), 5);
        assert!(ranking.windows(2).all(|w| w[0].ratio >= w[1].ratio));
        assert_eq!(ranking[0].name, "dozer");
    }

    #[test]
    fn test_utilization_zero_instances_no_divide_error() {
        let machines = vec![machine("crane", 3, 0)];
        let ranking = utilization_ranking(&machines);
        assert_eq!(ranking[0].ratio, 0.0);
    }

    #[test]
    fn test_utilization_ties_are_stable() {
        let machines = vec![machine("first", 1, 2), machine("second", 2, 4)];
        let ranking = utilization_ranking(&machines);
        assert_eq!(ranking[0].name, "first");
        assert_eq!(ranking[1].name, "second");
    }

    #[test]
    fn test_owner_totals() {
        let machines = vec![machine("loader", 1, 4), machine("dozer", 3, 3)];
        let bookings = vec![
            booking("2024-06-01T08:00:00Z", "2024-06-01T10:00:00Z", Some(500), BookingStatus::ApprovedByRenter),
            booking("2024-06-02T08:00:00Z", "2024-06-02T10:00:00Z", Some(500), BookingStatus::PendingRenterApproval),
            booking("2024-06-03T08:00:00Z", "2024-06-03T10:00:00Z", Some(500), BookingStatus::RejectedByRenter),
        ];

        let totals = owner_totals(&machines, &bookings);
        assert_eq!(totals.total_machines, 2);
        assert_eq!(totals.active_bookings, 1);
        assert_eq!(totals.pending_bookings, 1);
        assert_eq!(totals.total_revenue_cents, 1000);
    }
}
