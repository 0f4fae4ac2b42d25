//! Authentication error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password. Deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account exists but has been deactivated.
    #[error("account is inactive")]
    AccountInactive,

    /// The presented token matches no live session.
    #[error("invalid token")]
    TokenInvalid,

    /// The presented token's session has expired.
    #[error("token expired")]
    TokenExpired,

    /// Password hashing or verification failed.
    #[error("cryptography error: {0}")]
    Crypto(String),

    /// The user store failed.
    #[error("store error: {0}")]
    Store(#[from] filevault_core::CoreError),

    /// Internal state error (e.g. a poisoned lock).
    #[error("internal auth error: {0}")]
    Internal(String),
}
