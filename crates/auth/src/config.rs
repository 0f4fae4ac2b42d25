//! Auth configuration.

/// Configuration for the authentication service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Bearer-token session lifetime in seconds.
    pub token_lifetime_secs: u64,
    /// Optional secret prepended to passwords before hashing/verification.
    /// Must be identical at hash and verify time.
    pub pepper: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            // 24 hours, matching the session timeout the product brief calls for.
            token_lifetime_secs: 86_400,
            pepper: None,
        }
    }
}
