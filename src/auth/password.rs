/// Password hashing with Argon2id
use crate::error::{ApiError, ApiResult};
use argon2::{
    password_hash::SaltString, Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier as _,
};

/// One-way credential hasher
///
/// Produces PHC-format Argon2id hashes with a random salt. Verification runs
/// through `argon2`, whose comparison does not short-circuit on the first
/// mismatching byte.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Hash a plaintext password
    pub fn hash(&self, plaintext: &str) -> ApiResult<String> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| ApiError::Hashing(format!("Password hashing failed: {}", e)))?
            .to_string();

        Ok(hash)
    }

    /// Verify a plaintext password against a stored hash
    ///
    /// Returns `Ok(false)` on mismatch; fails only when the stored hash is
    /// malformed.
    pub fn verify(&self, plaintext: &str, stored_hash: &str) -> ApiResult<bool> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| ApiError::Hashing(format!("Malformed password hash: {}", e)))?;

        match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(ApiError::Hashing(format!(
                "Password verification failed: {}",
                e
            ))),
        }
    }
}
