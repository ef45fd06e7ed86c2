//! Profile reads and updates.

pub mod service;

pub use service::ProfileService;
