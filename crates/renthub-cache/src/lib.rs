//! # renthub-cache
//!
//! Query cache for RentHub. Reads are cached under keys built from the
//! procedure name plus its input ([`keys`]); mutations invalidate by
//! exact key or prefix pattern. Backends are pluggable behind the
//! `CacheProvider` trait: an in-memory moka store and a Redis store.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::CacheManager;
