//! Owner-side machine management.

pub mod service;

pub use service::MachineService;
