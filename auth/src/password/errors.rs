use thiserror::Error;

/// Failures of the credential store itself. A wrong password is not an error.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Stored digest is not a valid PHC string: {0}")]
    MalformedDigest(String),
}
