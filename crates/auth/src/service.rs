//! Authentication service — login, token authentication, logout.

use std::sync::Arc;

use filevault_core::{CoreError, User, UserStore};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::session::SessionStore;
use crate::token;

/// Orchestrates credential checks and bearer-token sessions.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    sessions: Arc<SessionStore>,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, config: AuthConfig) -> Self {
        Self {
            users,
            sessions: Arc::new(SessionStore::new()),
            config,
        }
    }

    /// Authenticate with username + password and issue a bearer token.
    ///
    /// An unknown username and a wrong password both surface as
    /// [`AuthError::InvalidCredentials`] so login responses do not reveal
    /// which usernames exist.
    pub fn login(&self, username: &str, plain_password: &str) -> Result<(String, User), AuthError> {
        let user = match self.users.get_by_username(username) {
            Ok(user) => user,
            Err(CoreError::NotFound { .. }) => return Err(AuthError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        };

        let valid = password::verify_password(
            plain_password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(AuthError::AccountInactive);
        }

        let bearer = token::generate_token();
        self.sessions.insert(
            token::fingerprint(&bearer),
            user.id,
            self.config.token_lifetime_secs,
        )?;

        tracing::info!(username = %user.username, role = %user.role, "login succeeded");
        Ok((bearer, user))
    }

    /// Resolve a presented bearer token to its user.
    pub fn authenticate(&self, bearer: &str) -> Result<User, AuthError> {
        let user_id = self.sessions.resolve(&token::fingerprint(bearer))?;
        let user = self.users.get_by_id(user_id)?;
        if !user.is_active {
            return Err(AuthError::AccountInactive);
        }
        Ok(user)
    }

    /// Invalidate the presented token.
    pub fn logout(&self, bearer: &str) -> Result<(), AuthError> {
        self.sessions.revoke(&token::fingerprint(bearer))
    }
}
