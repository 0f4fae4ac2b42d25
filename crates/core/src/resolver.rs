//! File resolution.
//!
//! Decides, for one (user, filename) pair, whether access is permitted and
//! where the bytes come from: the local files directory, or a remote fetch
//! through the [`DriveGateway`] that flips the entry's local-availability
//! flag on success.
//!
//! Every call records exactly one activity entry, whatever the outcome —
//! including not-found and denied attempts.

use std::path::PathBuf;
use std::sync::Arc;

use crate::activity::ActivityLog;
use crate::drive::DriveGateway;
use crate::error::{CoreError, CoreResult};
use crate::models::{AccessAction, FileEntry, User};
use crate::policy::permit;
use crate::store::CatalogStore;

/// A successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// The file was already available locally.
    Local { path: PathBuf },
    /// The file was fetched from the remote drive during this call.
    Fetched { path: PathBuf },
}

impl Resolved {
    pub fn path(&self) -> &std::path::Path {
        match self {
            Resolved::Local { path } | Resolved::Fetched { path } => path,
        }
    }
}

/// Outcome of an existence probe (no fetch side effect).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCheck {
    pub exists_locally: bool,
    pub local_path: Option<PathBuf>,
    /// Whether a remote copy could be fetched via a download request.
    pub download_available: bool,
}

/// Resolves catalog entries to local paths, fetching remotely on demand.
///
/// Concurrent resolutions of the same filename are tolerated: both callers
/// may fetch, and the last `mark_local` wins. Re-downloading the same
/// content to the same path is harmless, so no per-filename lock is taken.
#[derive(Clone)]
pub struct FileResolver {
    catalog: Arc<dyn CatalogStore>,
    gateway: Arc<dyn DriveGateway>,
    activity: ActivityLog,
    files_dir: PathBuf,
}

impl FileResolver {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        gateway: Arc<dyn DriveGateway>,
        activity: ActivityLog,
        files_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            catalog,
            gateway,
            activity,
            files_dir: files_dir.into(),
        }
    }

    /// Resolves `filename` for `user`, fetching from the remote drive when
    /// the file is not yet local.
    ///
    /// State machine:
    /// 1. no catalog entry → [`CoreError::NotFound`];
    /// 2. policy denial → [`CoreError::AccessDenied`];
    /// 3. already local → [`Resolved::Local`];
    /// 4. remote id present → gateway fetch; on success the entry's
    ///    `is_local` flag is persisted and [`Resolved::Fetched`] returned;
    ///    on failure [`CoreError::UpstreamFetchFailed`] with the catalog
    ///    untouched, so a retry simply re-attempts the fetch;
    /// 5. neither local nor remote → [`CoreError::NotAvailable`].
    pub fn resolve(
        &self,
        user: &User,
        filename: &str,
        action: AccessAction,
        origin: Option<String>,
    ) -> CoreResult<Resolved> {
        let entry = self.lookup_permitted(user, filename, action, &origin)?;
        let destination = self.files_dir.join(filename);

        if entry.is_local {
            self.activity.record(user, filename, action, true, origin);
            return Ok(Resolved::Local { path: destination });
        }

        let Some(drive_id) = entry.drive_id.as_deref() else {
            self.activity.record(user, filename, action, false, origin);
            return Err(CoreError::NotAvailable {
                filename: filename.to_string(),
            });
        };

        match self.gateway.fetch(drive_id, &destination) {
            Ok(()) => {
                if let Err(e) = self.catalog.mark_local(filename) {
                    self.activity.record(user, filename, action, false, origin);
                    return Err(e);
                }
                self.activity.record(user, filename, action, true, origin);
                Ok(Resolved::Fetched { path: destination })
            }
            Err(e) => {
                self.activity.record(user, filename, action, false, origin);
                Err(CoreError::UpstreamFetchFailed {
                    filename: filename.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Existence probe: reports local availability without fetching.
    ///
    /// The only side effect is one "view" activity entry whose success flag
    /// mirrors local presence.
    pub fn check(
        &self,
        user: &User,
        filename: &str,
        origin: Option<String>,
    ) -> CoreResult<FileCheck> {
        let entry = self.lookup_permitted(user, filename, AccessAction::View, &origin)?;
        let exists = entry.is_local;
        self.activity
            .record(user, filename, AccessAction::View, exists, origin);
        Ok(FileCheck {
            exists_locally: exists,
            local_path: if exists {
                Some(self.files_dir.join(filename))
            } else {
                None
            },
            download_available: entry.drive_id.is_some(),
        })
    }

    /// Local-only resolution for the "open in viewer" flow: never fetches.
    pub fn open_local(
        &self,
        user: &User,
        filename: &str,
        origin: Option<String>,
    ) -> CoreResult<PathBuf> {
        let entry = self.lookup_permitted(user, filename, AccessAction::View, &origin)?;
        if !entry.is_local {
            self.activity
                .record(user, filename, AccessAction::View, false, origin);
            return Err(CoreError::NotAvailable {
                filename: filename.to_string(),
            });
        }
        self.activity
            .record(user, filename, AccessAction::View, true, origin);
        Ok(self.files_dir.join(filename))
    }

    /// Steps 1 and 2 of the state machine, recording failed attempts.
    fn lookup_permitted(
        &self,
        user: &User,
        filename: &str,
        action: AccessAction,
        origin: &Option<String>,
    ) -> CoreResult<FileEntry> {
        let entry = match self.catalog.get(filename) {
            Ok(entry) => entry,
            Err(e) => {
                self.activity
                    .record(user, filename, action, false, origin.clone());
                return Err(e);
            }
        };
        if !permit(user.role, &entry.allowed_roles) {
            self.activity
                .record(user, filename, action, false, origin.clone());
            return Err(CoreError::AccessDenied {
                role: user.role,
                filename: filename.to_string(),
            });
        }
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Mutex;

    use tempfile::TempDir;

    use crate::drive::FetchError;
    use crate::models::{FileEntry, Role};
    use crate::store::{AccessLogStore, MemoryStore};

    /// Gateway double that records every fetch and either writes the
    /// destination file or fails.
    struct StubGateway {
        calls: Mutex<Vec<String>>,
        fail: bool,
    }

    impl StubGateway {
        fn succeeding() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl DriveGateway for StubGateway {
        fn fetch(&self, remote_id: &str, destination: &Path) -> Result<(), FetchError> {
            self.calls.lock().unwrap().push(remote_id.to_string());
            if self.fail {
                return Err(FetchError::Request("simulated outage".into()));
            }
            if let Some(parent) = destination.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(destination, b"fetched content")?;
            Ok(())
        }
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        gateway: Arc<StubGateway>,
        resolver: FileResolver,
        _files_dir: TempDir,
    }

    fn fixture(gateway: StubGateway) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let gateway = Arc::new(gateway);
        let files_dir = TempDir::new().unwrap();
        let resolver = FileResolver::new(
            store.clone(),
            gateway.clone(),
            ActivityLog::new(store.clone()),
            files_dir.path(),
        );
        Fixture {
            store,
            gateway,
            resolver,
            _files_dir: files_dir,
        }
    }

    fn user(role: Role) -> User {
        let name = role.to_string().to_lowercase();
        User::new(name.clone(), format!("{name}@filevault.test"), "hash", role)
    }

    fn seed(store: &MemoryStore, entry: FileEntry) {
        CatalogStore::upsert(store, entry).unwrap();
    }

    fn log_entries(store: &MemoryStore) -> Vec<crate::models::AccessLogEntry> {
        let mut entries = store.recent(usize::MAX, None).unwrap();
        entries.reverse();
        entries
    }

    #[test]
    fn unknown_filename_is_not_found_for_every_role() {
        let fx = fixture(StubGateway::succeeding());
        for role in [Role::Admin, Role::Manager, Role::Employee] {
            let err = fx
                .resolver
                .resolve(&user(role), "ghost.txt", AccessAction::View, None)
                .unwrap_err();
            assert!(matches!(err, CoreError::NotFound { .. }));
        }
        let entries = log_entries(&fx.store);
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| !e.success));
    }

    #[test]
    fn denied_attempt_is_recorded_as_failure() {
        let fx = fixture(StubGateway::succeeding());
        seed(
            &fx.store,
            FileEntry::new("audit.txt", 100, true, None, vec![Role::Admin]),
        );

        let err = fx
            .resolver
            .resolve(&user(Role::Employee), "audit.txt", AccessAction::Download, None)
            .unwrap_err();
        assert!(matches!(err, CoreError::AccessDenied { .. }));

        let entries = log_entries(&fx.store);
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].success);
        assert_eq!(entries[0].action, AccessAction::Download);
        assert_eq!(fx.gateway.call_count(), 0);
    }

    #[test]
    fn local_hit_never_invokes_the_gateway() {
        let fx = fixture(StubGateway::succeeding());
        seed(
            &fx.store,
            FileEntry::new(
                "handbook.txt",
                100,
                true,
                Some("drive-1".into()),
                vec![Role::Employee],
            ),
        );

        let resolved = fx
            .resolver
            .resolve(&user(Role::Employee), "handbook.txt", AccessAction::View, None)
            .unwrap();
        assert!(matches!(resolved, Resolved::Local { .. }));
        assert_eq!(fx.gateway.call_count(), 0);

        let entries = log_entries(&fx.store);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].success);
    }

    #[test]
    fn remote_fetch_converges_to_local_hits() {
        let fx = fixture(StubGateway::succeeding());
        seed(
            &fx.store,
            FileEntry::new(
                "manual.txt",
                100,
                false,
                Some("drive-2".into()),
                vec![Role::Employee],
            ),
        );
        let bob = user(Role::Employee);

        let first = fx
            .resolver
            .resolve(&bob, "manual.txt", AccessAction::Download, None)
            .unwrap();
        assert!(matches!(first, Resolved::Fetched { .. }));
        assert!(first.path().exists());
        assert_eq!(fx.gateway.call_count(), 1);
        assert!(CatalogStore::get(&*fx.store, "manual.txt").unwrap().is_local);

        // Subsequent resolutions are local hits with no further fetches.
        let second = fx
            .resolver
            .resolve(&bob, "manual.txt", AccessAction::Download, None)
            .unwrap();
        assert!(matches!(second, Resolved::Local { .. }));
        assert_eq!(fx.gateway.call_count(), 1);

        let entries = log_entries(&fx.store);
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.success));
    }

    #[test]
    fn failed_fetch_leaves_catalog_untouched() {
        let fx = fixture(StubGateway::failing());
        seed(
            &fx.store,
            FileEntry::new(
                "manual.txt",
                100,
                false,
                Some("drive-2".into()),
                vec![Role::Employee],
            ),
        );

        let err = fx
            .resolver
            .resolve(&user(Role::Employee), "manual.txt", AccessAction::Download, None)
            .unwrap_err();
        assert!(matches!(err, CoreError::UpstreamFetchFailed { .. }));
        assert!(!CatalogStore::get(&*fx.store, "manual.txt").unwrap().is_local);

        let entries = log_entries(&fx.store);
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].success);
    }

    #[test]
    fn missing_remote_id_is_not_available() {
        let fx = fixture(StubGateway::succeeding());
        seed(
            &fx.store,
            FileEntry::new("orphan.txt", 100, false, None, vec![Role::Employee]),
        );

        let err = fx
            .resolver
            .resolve(&user(Role::Employee), "orphan.txt", AccessAction::Download, None)
            .unwrap_err();
        assert!(matches!(err, CoreError::NotAvailable { .. }));
        assert_eq!(fx.gateway.call_count(), 0);
        assert_eq!(log_entries(&fx.store).len(), 1);
    }

    #[test]
    fn check_probes_without_fetching() {
        let fx = fixture(StubGateway::succeeding());
        seed(
            &fx.store,
            FileEntry::new(
                "manual.txt",
                100,
                false,
                Some("drive-2".into()),
                vec![Role::Employee],
            ),
        );

        let check = fx
            .resolver
            .check(&user(Role::Employee), "manual.txt", None)
            .unwrap();
        assert!(!check.exists_locally);
        assert!(check.local_path.is_none());
        assert!(check.download_available);
        assert_eq!(fx.gateway.call_count(), 0);

        // Success flag mirrors local presence for probes.
        let entries = log_entries(&fx.store);
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].success);
        assert_eq!(entries[0].action, AccessAction::View);
    }

    #[test]
    fn open_local_requires_a_local_copy() {
        let fx = fixture(StubGateway::succeeding());
        seed(
            &fx.store,
            FileEntry::new(
                "manual.txt",
                100,
                false,
                Some("drive-2".into()),
                vec![Role::Employee],
            ),
        );
        seed(
            &fx.store,
            FileEntry::new("handbook.txt", 100, true, None, vec![Role::Employee]),
        );
        let bob = user(Role::Employee);

        let err = fx.resolver.open_local(&bob, "manual.txt", None).unwrap_err();
        assert!(matches!(err, CoreError::NotAvailable { .. }));
        assert_eq!(fx.gateway.call_count(), 0);

        let path = fx.resolver.open_local(&bob, "handbook.txt", None).unwrap();
        assert!(path.ends_with("handbook.txt"));
    }

    /// Audit store double whose append always fails.
    struct FailingLogStore;

    impl AccessLogStore for FailingLogStore {
        fn append(&self, _entry: crate::models::AccessLogEntry) -> crate::error::CoreResult<()> {
            Err(CoreError::Persistence("simulated write failure".into()))
        }

        fn recent(
            &self,
            _limit: usize,
            _roles: Option<&[Role]>,
        ) -> crate::error::CoreResult<Vec<crate::models::AccessLogEntry>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn resolution_outcome_survives_audit_store_failure() {
        let store = Arc::new(MemoryStore::new());
        let gateway = Arc::new(StubGateway::succeeding());
        let files_dir = TempDir::new().unwrap();
        let resolver = FileResolver::new(
            store.clone(),
            gateway.clone(),
            ActivityLog::new(Arc::new(FailingLogStore)),
            files_dir.path(),
        );
        seed(
            &store,
            FileEntry::new("handbook.txt", 100, true, None, vec![Role::Employee]),
        );
        seed(
            &store,
            FileEntry::new(
                "manual.txt",
                100,
                false,
                Some("drive-2".into()),
                vec![Role::Employee],
            ),
        );
        let bob = user(Role::Employee);

        // A broken audit store must not change the primary outcome.
        let resolved = resolver
            .resolve(&bob, "handbook.txt", AccessAction::View, None)
            .unwrap();
        assert!(matches!(resolved, Resolved::Local { .. }));

        let fetched = resolver
            .resolve(&bob, "manual.txt", AccessAction::Download, None)
            .unwrap();
        assert!(matches!(fetched, Resolved::Fetched { .. }));

        // Errors still surface as themselves, not as logging failures.
        let err = resolver
            .resolve(&bob, "ghost.txt", AccessAction::View, None)
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    /// The worked example from the product brief: an admin-only entry,
    /// denied to an employee, fetched remotely for an admin.
    #[test]
    fn security_policies_scenario() {
        let fx = fixture(StubGateway::succeeding());
        seed(
            &fx.store,
            FileEntry::new(
                "security-policies.txt",
                91_136,
                false,
                Some("drive-5".into()),
                vec![Role::Admin],
            ),
        );

        let err = fx
            .resolver
            .resolve(
                &user(Role::Employee),
                "security-policies.txt",
                AccessAction::View,
                Some("10.0.0.7".into()),
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::AccessDenied { .. }));

        let resolved = fx
            .resolver
            .resolve(
                &user(Role::Admin),
                "security-policies.txt",
                AccessAction::Download,
                Some("10.0.0.1".into()),
            )
            .unwrap();
        assert!(matches!(resolved, Resolved::Fetched { .. }));
        assert!(
            CatalogStore::get(&*fx.store, "security-policies.txt")
                .unwrap()
                .is_local
        );

        let entries = log_entries(&fx.store);
        assert_eq!(entries.len(), 2);
        assert!(!entries[0].success);
        assert_eq!(entries[0].origin.as_deref(), Some("10.0.0.7"));
        assert!(entries[1].success);
        assert_eq!(entries[1].user_role, Role::Admin);
    }
}
