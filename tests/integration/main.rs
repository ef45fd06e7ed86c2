//! Integration test harness for the RentHub server.
//!
//! Tests that need a live PostgreSQL are `#[ignore]`d; everything else
//! runs against the in-process router with a lazy (unconnected) pool.

mod helpers;

mod auth_test;
mod booking_flow_test;
mod guard_test;
mod upload_test;
