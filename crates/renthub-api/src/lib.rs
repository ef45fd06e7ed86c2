//! # renthub-api
//!
//! HTTP API layer for RentHub built on Axum.
//!
//! Provides the actor-namespaced REST endpoints, middleware (session
//! gate, request logging, CORS, compression), extractors, DTOs, and
//! error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
