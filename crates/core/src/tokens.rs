//! Single-use secret tokens (password reset links).
//!
//! The plaintext is handed to the user once; only the SHA-256 digest is
//! stored.

use rand::Rng;

/// Length of a generated token (alphanumeric characters).
pub const TOKEN_LENGTH: usize = 48;

/// How long a password reset token stays valid.
pub const RESET_TOKEN_TTL_MINS: i64 = 60;

/// A freshly generated token and its digest.
pub struct GeneratedToken {
    /// Sent to the user, never persisted.
    pub plaintext: String,
    /// SHA-256 hex digest, persisted.
    pub hash: String,
}

/// Generate a random alphanumeric token.
pub fn generate_token() -> GeneratedToken {
    let plaintext: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect();
    let hash = hash_token(&plaintext);
    GeneratedToken { plaintext, hash }
}

/// Digest a token for lookup.
pub fn hash_token(token: &str) -> String {
    crate::hashing::sha256_hex(token.as_bytes())
}
