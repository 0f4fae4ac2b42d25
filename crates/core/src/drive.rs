//! Remote drive capability.
//!
//! The core only needs "fetch these bytes by remote id into this path";
//! the concrete client (Google Drive over HTTP in the server binary) is
//! injected so tests can run without a network.

use std::path::Path;

use thiserror::Error;

/// Errors a gateway fetch can produce.
///
/// The resolver does not distinguish between these beyond logging; a
/// timeout is ordinary fetch failure.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The remote request failed (transport error, timeout, non-2xx).
    #[error("drive request failed: {0}")]
    Request(String),

    /// Writing the fetched bytes to the destination failed.
    #[error("failed to write fetched file: {0}")]
    Io(#[from] std::io::Error),
}

/// Opaque "fetch bytes by remote id into a local path" operation.
pub trait DriveGateway: Send + Sync {
    /// Downloads the remote object identified by `remote_id` into
    /// `destination`, creating parent directories as needed.
    ///
    /// Blocking from the caller's perspective: returns only once the file
    /// is fully written or the fetch has failed.
    fn fetch(&self, remote_id: &str, destination: &Path) -> Result<(), FetchError>;
}
