//! Activity recording and the privileged activity query.

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::models::{AccessAction, AccessLogEntry, Role, User};
use crate::store::AccessLogStore;

/// How many entries the activity view returns at most.
pub const RECENT_ACTIVITY_LIMIT: usize = 50;

/// Append-only audit trail of file access attempts.
#[derive(Clone)]
pub struct ActivityLog {
    store: Arc<dyn AccessLogStore>,
}

impl ActivityLog {
    pub fn new(store: Arc<dyn AccessLogStore>) -> Self {
        Self { store }
    }

    /// Records one access attempt, best-effort.
    ///
    /// A store failure must never change the outcome the end user sees, so
    /// it is swallowed here and surfaced only as a warning.
    pub fn record(
        &self,
        user: &User,
        filename: &str,
        action: AccessAction,
        success: bool,
        origin: Option<String>,
    ) {
        let entry = AccessLogEntry::for_attempt(user, filename, action, success, origin);
        if let Err(e) = self.store.append(entry) {
            tracing::warn!(
                username = %user.username,
                filename,
                %action,
                "failed to append access log entry: {e}"
            );
        }
    }

    /// Recent activity visible to `user`, newest first.
    ///
    /// Admin sees the latest entries across all users; Manager sees only
    /// entries recorded for Manager and Employee accounts; Employee is
    /// always denied.
    pub fn list_for(&self, user: &User) -> CoreResult<Vec<AccessLogEntry>> {
        match user.role {
            Role::Admin => self.store.recent(RECENT_ACTIVITY_LIMIT, None),
            Role::Manager => self
                .store
                .recent(RECENT_ACTIVITY_LIMIT, Some(&Role::MANAGER_VISIBLE[..])),
            Role::Employee => Err(CoreError::AccessDenied {
                role: user.role,
                filename: "activity log".to_string(),
            }),
        }
    }
}
