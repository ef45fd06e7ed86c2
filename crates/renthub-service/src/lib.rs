//! # renthub-service
//!
//! Business logic for RentHub. Services compose repositories, the query
//! cache, and storage; every operation takes a [`context::RequestContext`]
//! so ownership and actor checks happen before any mutation.

pub mod booking;
pub mod catalog;
pub mod context;
pub mod dashboard;
pub mod machine;
pub mod profile;

pub use context::RequestContext;
