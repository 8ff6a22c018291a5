//! # Password Hashing
//!
//! Argon2 credential hashing for user accounts.
//!
//! The directory store persists only the hash; plaintext passwords exist
//! transiently in the admin's create/update request and are discarded after
//! hashing. Verification is a pure computation over the stored hash, so this
//! module stays in seedling-core (the only ambient input is OS entropy for
//! salt generation).

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};

use crate::error::ValidationError;

/// Hashes a plaintext password for storage.
///
/// Uses Argon2id with default parameters and a random per-password salt.
pub fn hash_password(password: &str) -> Result<String, ValidationError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ValidationError::InvalidFormat {
            field: "password".to_string(),
            reason: format!("could not be hashed: {e}"),
        })?;

    Ok(hash.to_string())
}

/// Verifies a plaintext password against a stored hash.
///
/// Returns false for both wrong passwords and malformed hashes; callers never
/// need to distinguish the two.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
