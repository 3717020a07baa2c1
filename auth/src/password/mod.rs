pub mod argon2;
pub mod errors;

pub use argon2::Argon2CredentialStore;
pub use errors::PasswordError;

/// One-way password hashing capability.
///
/// Implementations must salt every call so equal plaintexts yield different
/// digests, and must compare in constant time on verification.
pub trait CredentialStore: Send + Sync + 'static {
    /// Hash a plaintext password into an opaque digest.
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError>;

    /// Check a plaintext password against a stored digest.
    ///
    /// # Returns
    /// True if the password matches, false otherwise
    ///
    /// # Errors
    /// * `MalformedDigest` - The digest is not a recognisable hash
    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, PasswordError>;
}
