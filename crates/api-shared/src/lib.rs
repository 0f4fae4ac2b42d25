//! # API Shared
//!
//! Request/response types for the FileVault REST API.
//!
//! Contains:
//! - Serde DTOs with utoipa schemas for every endpoint
//! - The shared `HealthService`
//!
//! Kept free of domain logic so the wire contract is visible in one place.

pub mod health;
pub mod types;

pub use health::HealthService;
pub use types::*;
