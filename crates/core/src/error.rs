//! Error types for the FileVault core.

use thiserror::Error;

use crate::models::Role;

#[derive(Debug, Error)]
pub enum CoreError {
    /// No record exists for the requested key (catalog entry or user).
    #[error("not found: {filename}")]
    NotFound { filename: String },

    /// The access policy rejected the request.
    #[error("access denied for role {role}: {filename}")]
    AccessDenied { role: Role, filename: String },

    /// The entry exists but has neither a local copy nor a remote id.
    #[error("file not available locally or remotely: {filename}")]
    NotAvailable { filename: String },

    /// The drive gateway failed to deliver the file.
    #[error("remote fetch failed for {filename}: {reason}")]
    UpstreamFetchFailed { filename: String, reason: String },

    /// A record-store read or write failed.
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// Input violated a model invariant.
    #[error("validation error: {message}")]
    Validation { message: String },
}

pub type CoreResult<T> = Result<T, CoreError>;
