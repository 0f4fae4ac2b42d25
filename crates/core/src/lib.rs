//! # FileVault Core
//!
//! Domain logic for the FileVault role-gated file catalog:
//!
//! - Access policy (role vs. allowed-role set)
//! - Role-filtered catalog queries
//! - File resolution, including remote fetch through a [`DriveGateway`]
//! - The append-only activity log and its privileged query
//!
//! Persistence sits behind the store traits in [`store`] so that the
//! decision logic stays independent of any database. The HTTP layer lives
//! in the `filevault-run` binary and only maps these operations onto
//! request/response types.

#![warn(rust_2018_idioms)]

pub mod activity;
pub mod catalog;
pub mod drive;
pub mod error;
pub mod models;
pub mod policy;
pub mod resolver;
pub mod store;

pub use activity::{ActivityLog, RECENT_ACTIVITY_LIMIT};
pub use catalog::CatalogService;
pub use drive::{DriveGateway, FetchError};
pub use error::{CoreError, CoreResult};
pub use models::{AccessAction, AccessLogEntry, FileEntry, Role, User};
pub use resolver::{FileCheck, FileResolver, Resolved};
pub use store::{AccessLogStore, CatalogStore, MemoryStore, UserStore};
