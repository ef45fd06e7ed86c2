//! # renthub-storage
//!
//! Object storage for RentHub: a pluggable provider behind the
//! `StorageProvider` trait (currently local filesystem) plus pre-signed
//! upload tickets for the direct-to-storage upload boundary.

pub mod manager;
pub mod presign;
pub mod providers;

pub use manager::StorageManager;
pub use presign::{Presigner, UploadTicket};
