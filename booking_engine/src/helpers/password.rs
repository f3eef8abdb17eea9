//! Password hashing and verification.
//!
//! Passwords are stored as argon2id PHC strings. The salt is generated per hash, so two users with the same
//! password never share a hash, and verification needs nothing beyond the stored string itself.
use argon2::Argon2;
use password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Could not hash password: {0}")]
pub struct PasswordHashError(String);

/// Hash a plain password with argon2id, returning the PHC string to store.
pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| PasswordHashError(e.to_string()))
}

/// Verify a plain password against a stored PHC string. An unparseable hash verifies as `false` rather than
/// erroring; a corrupt stored hash must never let a login through.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
        .unwrap_or(false)
}
