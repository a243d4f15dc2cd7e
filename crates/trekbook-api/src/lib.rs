//! # trekbook-api
//!
//! HTTP API layer for TrekBook built on Axum.
//!
//! Provides the REST endpoints, extractors, DTOs, and error mapping.
//! Authentication is an external collaborator: the upstream gateway
//! verifies sessions and forwards the caller's identity in headers.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
