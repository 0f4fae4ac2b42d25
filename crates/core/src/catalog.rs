//! Role-filtered catalog queries.

use std::sync::Arc;

use crate::error::CoreResult;
use crate::models::{FileEntry, Role, User};
use crate::policy::permit;
use crate::store::CatalogStore;

/// Read-side view of the file catalog.
///
/// Listing is filtered through the access policy; seeding and imports go
/// through [`CatalogService::upsert`] so the `allowed_roles` invariant is
/// enforced in one place (the store).
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Entries visible to `user`, in catalog insertion order.
    ///
    /// Admin sees everything; other roles see the subset the policy
    /// permits. Read-only.
    pub fn list_for(&self, user: &User) -> CoreResult<Vec<FileEntry>> {
        let entries = self.store.list()?;
        if user.role == Role::Admin {
            return Ok(entries);
        }
        Ok(entries
            .into_iter()
            .filter(|e| permit(user.role, &e.allowed_roles))
            .collect())
    }

    /// Creates or replaces a catalog entry.
    pub fn upsert(&self, entry: FileEntry) -> CoreResult<()> {
        self.store.upsert(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service_with_entries() -> CatalogService {
        let store = Arc::new(MemoryStore::new());
        let service = CatalogService::new(store);
        let entries = [
            ("handbook.txt", vec![Role::Admin, Role::Manager, Role::Employee]),
            ("budgets.txt", vec![Role::Admin, Role::Manager]),
            ("audit.txt", vec![Role::Admin]),
        ];
        for (name, roles) in entries {
            service
                .upsert(FileEntry::new(name, 512, true, None, roles))
                .unwrap();
        }
        service
    }

    fn user(role: Role) -> User {
        User::new("someone", "someone@filevault.test", "hash", role)
    }

    #[test]
    fn admin_sees_every_entry() {
        let listing = service_with_entries().list_for(&user(Role::Admin)).unwrap();
        assert_eq!(listing.len(), 3);
    }

    #[test]
    fn listing_is_exactly_the_permitted_subset() {
        let service = service_with_entries();

        let manager: Vec<_> = service
            .list_for(&user(Role::Manager))
            .unwrap()
            .into_iter()
            .map(|e| e.filename)
            .collect();
        assert_eq!(manager, ["handbook.txt", "budgets.txt"]);

        let employee: Vec<_> = service
            .list_for(&user(Role::Employee))
            .unwrap()
            .into_iter()
            .map(|e| e.filename)
            .collect();
        assert_eq!(employee, ["handbook.txt"]);
    }
}
