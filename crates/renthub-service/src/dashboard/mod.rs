//! Owner dashboard: pure aggregation plus the assembling service.

pub mod aggregate;
pub mod service;

pub use service::{DashboardService, OwnerDashboard};
