//! In-memory session store.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::error::AuthError;

/// One live session, keyed externally by token fingerprint.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Token-fingerprint → session map with expiry.
///
/// Expired sessions are dropped lazily on lookup; there is no background
/// sweeper.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a session for `user_id` under `fingerprint`.
    pub fn insert(
        &self,
        fingerprint: String,
        user_id: Uuid,
        lifetime_secs: u64,
    ) -> Result<(), AuthError> {
        let now = Utc::now();
        let session = Session {
            user_id,
            created_at: now,
            expires_at: now + Duration::seconds(lifetime_secs as i64),
        };
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AuthError::Internal("session lock poisoned".into()))?;
        sessions.insert(fingerprint, session);
        Ok(())
    }

    /// Resolves a fingerprint to the session's user id.
    ///
    /// An expired session is removed and reported as `TokenExpired`; an
    /// unknown fingerprint as `TokenInvalid`.
    pub fn resolve(&self, fingerprint: &str) -> Result<Uuid, AuthError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AuthError::Internal("session lock poisoned".into()))?;
        let session = sessions.get(fingerprint).ok_or(AuthError::TokenInvalid)?;
        if session.expires_at <= Utc::now() {
            sessions.remove(fingerprint);
            return Err(AuthError::TokenExpired);
        }
        Ok(session.user_id)
    }

    /// Removes a session; errors if none existed.
    pub fn revoke(&self, fingerprint: &str) -> Result<(), AuthError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AuthError::Internal("session lock poisoned".into()))?;
        sessions
            .remove(fingerprint)
            .map(|_| ())
            .ok_or(AuthError::TokenInvalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_resolve_revoke_cycle() {
        let store = SessionStore::new();
        let user_id = Uuid::new_v4();
        store.insert("fp".into(), user_id, 3600).unwrap();

        assert_eq!(store.resolve("fp").unwrap(), user_id);
        store.revoke("fp").unwrap();
        assert!(matches!(store.resolve("fp"), Err(AuthError::TokenInvalid)));
    }

    #[test]
    fn expired_session_is_dropped_on_lookup() {
        let store = SessionStore::new();
        store.insert("fp".into(), Uuid::new_v4(), 0).unwrap();

        assert!(matches!(store.resolve("fp"), Err(AuthError::TokenExpired)));
        // Second lookup sees it as gone entirely.
        assert!(matches!(store.resolve("fp"), Err(AuthError::TokenInvalid)));
    }

    #[test]
    fn unknown_fingerprint_is_invalid() {
        let store = SessionStore::new();
        assert!(matches!(store.resolve("nope"), Err(AuthError::TokenInvalid)));
        assert!(matches!(store.revoke("nope"), Err(AuthError::TokenInvalid)));
    }
}
