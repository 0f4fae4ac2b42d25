//! Domain models for the FileVault catalog and audit trail.

mod access_log;
mod file_entry;
mod role;
mod user;

pub use access_log::{AccessAction, AccessLogEntry};
pub use file_entry::FileEntry;
pub use role::Role;
pub use user::User;
