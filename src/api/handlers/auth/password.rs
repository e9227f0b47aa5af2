//! Argon2id password hashing.
//!
//! Hashes are PHC strings carrying their own salt and parameters; comparison
//! re-runs the KDF, so no plaintext or reusable digest ever leaves this module.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a password with a fresh random salt.
///
/// # Errors
/// Returns an error if the KDF rejects the input.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| anyhow!("failed to hash password: {err}"))
}

/// Check a candidate password against a stored PHC hash string.
///
/// An unparseable stored hash counts as a mismatch rather than an error so
/// login keeps its uniform failure branch.
#[must_use]
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::{hash_password, verify_password};

    #[test]
    fn hash_then_verify_round_trips() {
        let hash = hash_password("correct horse battery staple").expect("hashing");
        assert!(verify_password("correct horse battery staple", &hash));
        assert!(!verify_password("correct horse battery stable", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("password123").expect("hashing");
        let second = hash_password("password123").expect("hashing");
        assert_ne!(first, second);
    }

    #[test]
    fn garbage_stored_hash_is_a_mismatch() {
        assert!(!verify_password("password123", "not-a-phc-string"));
    }
}
