//! Record store traits and the in-memory implementation.
//!
//! The core never talks to a database directly; it goes through these
//! traits so tests (and alternative backends) can substitute their own
//! storage. [`MemoryStore`] is the default backend: RwLock-guarded
//! collections with per-entry atomic writes, which is all the concurrency
//! model requires.

use std::sync::RwLock;

use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::models::{AccessLogEntry, FileEntry, Role, User};

/// User account storage.
pub trait UserStore: Send + Sync {
    fn get_by_id(&self, id: Uuid) -> CoreResult<User>;
    fn get_by_username(&self, username: &str) -> CoreResult<User>;
    /// Creates the user, or replaces the record with the same username.
    fn upsert(&self, user: User) -> CoreResult<()>;
}

/// File catalog storage.
pub trait CatalogStore: Send + Sync {
    fn get(&self, filename: &str) -> CoreResult<FileEntry>;
    /// Creates the entry, or replaces the record with the same filename.
    ///
    /// Rejects entries with an empty `allowed_roles` set.
    fn upsert(&self, entry: FileEntry) -> CoreResult<()>;
    /// Flips `is_local` to true for an existing entry.
    fn mark_local(&self, filename: &str) -> CoreResult<()>;
    /// All entries in insertion order.
    fn list(&self) -> CoreResult<Vec<FileEntry>>;
}

/// Append-only access log storage.
pub trait AccessLogStore: Send + Sync {
    fn append(&self, entry: AccessLogEntry) -> CoreResult<()>;
    /// Up to `limit` entries, newest first, optionally restricted to
    /// entries whose recorded user role is in `roles`.
    fn recent(&self, limit: usize, roles: Option<&[Role]>) -> CoreResult<Vec<AccessLogEntry>>;
}

/// In-memory record store backing all three storage traits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    catalog: RwLock<Vec<FileEntry>>,
    access_log: RwLock<Vec<AccessLogEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(what: &str) -> CoreError {
    CoreError::Persistence(format!("{what} lock poisoned"))
}

impl UserStore for MemoryStore {
    fn get_by_id(&self, id: Uuid) -> CoreResult<User> {
        let users = self.users.read().map_err(|_| poisoned("user"))?;
        users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                filename: format!("user {id}"),
            })
    }

    fn get_by_username(&self, username: &str) -> CoreResult<User> {
        let users = self.users.read().map_err(|_| poisoned("user"))?;
        users
            .iter()
            .find(|u| u.username == username)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                filename: format!("user {username}"),
            })
    }

    fn upsert(&self, user: User) -> CoreResult<()> {
        let mut users = self.users.write().map_err(|_| poisoned("user"))?;
        match users.iter_mut().find(|u| u.username == user.username) {
            Some(existing) => *existing = user,
            None => users.push(user),
        }
        Ok(())
    }
}

impl CatalogStore for MemoryStore {
    fn get(&self, filename: &str) -> CoreResult<FileEntry> {
        let catalog = self.catalog.read().map_err(|_| poisoned("catalog"))?;
        catalog
            .iter()
            .find(|e| e.filename == filename)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                filename: filename.to_string(),
            })
    }

    fn upsert(&self, entry: FileEntry) -> CoreResult<()> {
        if entry.allowed_roles.is_empty() {
            return Err(CoreError::Validation {
                message: format!("entry {} has an empty allowed_roles set", entry.filename),
            });
        }
        let mut catalog = self.catalog.write().map_err(|_| poisoned("catalog"))?;
        match catalog.iter_mut().find(|e| e.filename == entry.filename) {
            Some(existing) => *existing = entry,
            None => catalog.push(entry),
        }
        Ok(())
    }

    fn mark_local(&self, filename: &str) -> CoreResult<()> {
        let mut catalog = self.catalog.write().map_err(|_| poisoned("catalog"))?;
        let entry = catalog
            .iter_mut()
            .find(|e| e.filename == filename)
            .ok_or_else(|| CoreError::NotFound {
                filename: filename.to_string(),
            })?;
        entry.is_local = true;
        entry.last_modified = chrono::Utc::now();
        Ok(())
    }

    fn list(&self) -> CoreResult<Vec<FileEntry>> {
        let catalog = self.catalog.read().map_err(|_| poisoned("catalog"))?;
        Ok(catalog.clone())
    }
}

impl AccessLogStore for MemoryStore {
    fn append(&self, entry: AccessLogEntry) -> CoreResult<()> {
        let mut log = self.access_log.write().map_err(|_| poisoned("access log"))?;
        log.push(entry);
        Ok(())
    }

    fn recent(&self, limit: usize, roles: Option<&[Role]>) -> CoreResult<Vec<AccessLogEntry>> {
        let log = self.access_log.read().map_err(|_| poisoned("access log"))?;
        Ok(log
            .iter()
            .rev()
            .filter(|e| roles.map_or(true, |rs| rs.contains(&e.user_role)))
            .take(limit)
            .cloned()
            .collect())
    }
}
