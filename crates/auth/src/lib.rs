//! # FileVault Auth
//!
//! Credential verification and bearer-token session handling:
//!
//! - Argon2id password hashing and verification
//! - Opaque random bearer tokens, stored only as SHA-256 fingerprints
//! - In-memory session store with expiry
//! - [`AuthService`] tying login, token authentication and logout together
//!
//! Generic over the core's `UserStore` so the auth layer carries no
//! persistence dependency of its own.

#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod session;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::AuthService;
pub use session::SessionStore;
