//! Booking lifecycle orchestration.

pub mod service;

pub use service::{AvailabilityResult, BookingService, CheckAvailability, RequestBooking};
