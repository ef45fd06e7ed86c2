//! Cache key builders for all RentHub cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses. Keys mirror the read
//! operation plus its input, so a cached read is exactly one key.

use uuid::Uuid;

/// Prefix applied to all RentHub cache keys.
const PREFIX: &str = "renthub";

// ── Catalog keys ───────────────────────────────────────────

/// Cache key for one catalog page.
pub fn catalog_page(category: Option<&str>, search: Option<&str>, page: u64) -> String {
    format!(
        "{PREFIX}:catalog:{}:{}:p{page}",
        category.unwrap_or("-"),
        search.unwrap_or("-")
    )
}

/// Cache key for a machine template detail with stats.
pub fn machine_detail(template_id: Uuid) -> String {
    format!("{PREFIX}:machine:{template_id}")
}

/// Pattern to invalidate every catalog page.
pub fn catalog_pattern() -> String {
    format!("{PREFIX}:catalog:*")
}

// ── Booking keys ───────────────────────────────────────────

/// Cache key for a client's booking list page.
pub fn client_bookings(client_id: Uuid, page: u64) -> String {
    format!("{PREFIX}:bookings:client:{client_id}:p{page}")
}

/// Pattern to invalidate a client's booking pages.
pub fn client_bookings_pattern(client_id: Uuid) -> String {
    format!("{PREFIX}:bookings:client:{client_id}:*")
}

/// Cache key for an owner's booking list page.
pub fn owner_bookings(owner_id: Uuid, status: Option<&str>, page: u64) -> String {
    format!(
        "{PREFIX}:bookings:owner:{owner_id}:{}:p{page}",
        status.unwrap_or("-")
    )
}

/// Pattern to invalidate an owner's booking pages.
pub fn owner_bookings_pattern(owner_id: Uuid) -> String {
    format!("{PREFIX}:bookings:owner:{owner_id}:*")
}

// ── Dashboard keys ─────────────────────────────────────────

/// Cache key for an owner's assembled dashboard.
pub fn owner_dashboard(owner_id: Uuid) -> String {
    format!("{PREFIX}:dashboard:{owner_id}")
}

// ── Session keys ───────────────────────────────────────────

/// Cache key for the JWT blocklist (revoked token IDs).
pub fn jwt_blocklist(jti: Uuid) -> String {
    format!("{PREFIX}:jwt:blocked:{jti}")
}

/// Cache key for a blocked (terminated) session.
pub fn session_blocklist(session_id: Uuid) -> String {
    format!("{PREFIX}:session:blocked:{session_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_page_encodes_filters() {
        let key = catalog_page(Some("excavator"), None, 2);
        assert_eq!(key, "renthub:catalog:excavator:-:p2");
    }

    #[test]
    fn test_patterns_prefix_their_keys() {
        let id = Uuid::new_v4();
        assert!(client_bookings(id, 1).starts_with(client_bookings_pattern(id).trim_end_matches('*')));
        assert!(owner_bookings(id, Some("pending_renter_approval"), 3)
            .starts_with(owner_bookings_pattern(id).trim_end_matches('*')));
    }
}
