//! Opaque bearer token generation and fingerprinting.
//!
//! Tokens are 32 random bytes, base64url-encoded, returned to the client
//! once and never persisted. Sessions are keyed by the token's SHA-256
//! fingerprint, so a leaked session table does not leak usable tokens.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Number of random bytes in a freshly issued token.
const TOKEN_BYTES: usize = 32;

/// Generate a new opaque bearer token.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// SHA-256 fingerprint of a token, hex-encoded, used as the session key.
pub fn fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
