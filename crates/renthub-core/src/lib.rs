//! # renthub-core
//!
//! Core crate for RentHub. Contains the unified error system,
//! configuration schemas, shared types (pagination), and the provider
//! traits for cache and storage backends.
//!
//! This crate has **no** internal dependencies on other RentHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
