//! Password hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::LazyLock;
use thiserror::Error;

/// A hash of a password nobody submits, checked against when the username is
/// unknown so that lookup costs as much as a real password check
static UNUSABLE_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password(&crate::auth::session::generate_session_token()).ok());

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    Hash(String),
}

/// Argon2 hashing parameters.
#[derive(Debug, Clone, Copy)]
pub struct Argon2Params {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Argon2Params {
    fn to_argon2(self) -> Result<Argon2<'static>, PasswordError> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| PasswordError::Hash(format!("invalid argon2 params: {e}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for Argon2Params {
    /// Argon2id RFC recommendations
    fn default() -> Self {
        Self {
            memory_kib: 19456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// Hashes a password into a PHC string (`$argon2id$v=19$...`)
pub fn hash_password(raw: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2Params::default().to_argon2()?;
    let hash = argon2
        .hash_password(raw.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Checks a password against a stored PHC hash.
///
/// A malformed stored hash never verifies.
pub fn verify_password(raw: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        // Parameters come from the hash itself
        Ok(parsed) => Argon2::default().verify_password(raw.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}

/// Runs one password verification that never succeeds
pub fn verify_unusable(raw: &str) {
    if let Some(hash) = UNUSABLE_HASH.as_deref() {
        let _ = verify_password(raw, hash);
    }
}
