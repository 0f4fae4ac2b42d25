//! Audit trail model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Role, User};

/// What the caller was trying to do with a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessAction {
    View,
    Download,
}

impl fmt::Display for AccessAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AccessAction::View => "view",
            AccessAction::Download => "download",
        })
    }
}

/// One immutable record of a file access attempt.
///
/// `username` and `user_role` are snapshots taken at record time so that
/// later account changes never rewrite history, and so the manager-scoped
/// activity query can filter without joining back to the user store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessLogEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub user_role: Role,
    pub filename: String,
    pub action: AccessAction,
    pub success: bool,
    pub origin: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AccessLogEntry {
    /// Builds an entry for `user`'s attempt on `filename`, stamped now.
    pub fn for_attempt(
        user: &User,
        filename: impl Into<String>,
        action: AccessAction,
        success: bool,
        origin: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user.id,
            username: user.username.clone(),
            user_role: user.role,
            filename: filename.into(),
            action,
            success,
            origin,
            timestamp: Utc::now(),
        }
    }
}
