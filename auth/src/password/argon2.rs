use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;
use super::CredentialStore;

/// Argon2id credential store.
///
/// Digests are PHC strings carrying algorithm, parameters, salt and hash, so
/// verification needs nothing but the stored digest.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2CredentialStore;

impl Argon2CredentialStore {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialStore for Argon2CredentialStore {
    /// Hash with a fresh random salt from the OS generator.
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Recompute the hash with the digest's salt and parameters.
    ///
    /// The final comparison is constant-time inside `argon2`.
    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(digest).map_err(|e| {
            PasswordError::MalformedDigest(e.to_string())
        })?;

        Ok(Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok())
    }
}
