//! Catalog entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Role;

/// Metadata record describing one file in the catalog.
///
/// `filename` is the unique key. `is_local` is the only field mutated after
/// creation, and only by the resolver after a successful remote fetch.
///
/// Invariant: `allowed_roles` is non-empty. Admin bypasses the set entirely,
/// so an empty set would make an entry reachable by nobody else while
/// looking like a configuration rather than a decision — the catalog store
/// rejects it at upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub filename: String,
    pub size_bytes: u64,
    pub is_local: bool,
    pub drive_id: Option<String>,
    pub allowed_roles: Vec<Role>,
    pub last_modified: DateTime<Utc>,
}

impl FileEntry {
    pub fn new(
        filename: impl Into<String>,
        size_bytes: u64,
        is_local: bool,
        drive_id: Option<String>,
        allowed_roles: Vec<Role>,
    ) -> Self {
        Self {
            filename: filename.into(),
            size_bytes,
            is_local,
            drive_id,
            allowed_roles,
            last_modified: Utc::now(),
        }
    }
}
