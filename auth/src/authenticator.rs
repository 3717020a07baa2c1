use std::sync::OnceLock;

use chrono::Duration;

use crate::password::Argon2CredentialStore;
use crate::password::CredentialStore;
use crate::password::PasswordError;
use crate::token::AuthenticatedIdentity;
use crate::token::TokenCodec;
use crate::token::TokenError;

/// Authentication coordinator combining credential verification and token
/// issuance.
pub struct Authenticator<C = Argon2CredentialStore>
where
    C: CredentialStore,
{
    credential_store: C,
    token_codec: TokenCodec,
    token_ttl: Duration,
    /// Digest verified against when the subject is unknown, hashed on first use.
    decoy_digest: OnceLock<Option<String>>,
}

const DECOY_PASSWORD: &str = "decoy-password-for-unknown-subjects";

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator<Argon2CredentialStore> {
    /// Create an authenticator backed by Argon2id.
    ///
    /// # Arguments
    /// * `token_secret` - Secret key for token signing
    /// * `token_ttl` - Lifetime of every issued token
    pub fn new(token_secret: &[u8], token_ttl: Duration) -> Self {
        Self::with_credential_store(Argon2CredentialStore::new(), token_secret, token_ttl)
    }
}

impl<C> Authenticator<C>
where
    C: CredentialStore,
{
    pub fn with_credential_store(credential_store: C, token_secret: &[u8], token_ttl: Duration) -> Self {
        Self {
            credential_store,
            token_codec: TokenCodec::new(token_secret),
            token_ttl,
            decoy_digest: OnceLock::new(),
        }
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Verify credentials and issue a token for `subject`.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored digest could not be parsed
    /// * `TokenError` - Token issuance failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_digest: &str,
        subject: &str,
        roles: &[String],
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.credential_store.verify(password, stored_digest)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.issue_token(subject, roles)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Reject a login for a subject with no stored digest.
    ///
    /// Still runs a full verification against a decoy digest, so the response
    /// time does not reveal whether the subject exists.
    pub fn reject_unknown_subject(&self, password: &str) -> AuthenticationError {
        let decoy = self
            .decoy_digest
            .get_or_init(|| self.credential_store.hash(DECOY_PASSWORD).ok());

        if let Some(digest) = decoy {
            let _ = self.credential_store.verify(password, digest);
        }

        AuthenticationError::InvalidCredentials
    }

    /// Issue a token without checking a password.
    ///
    /// Used right after registration, where the caller has just supplied the
    /// credentials that were stored.
    pub fn issue_token(&self, subject: &str, roles: &[String]) -> Result<String, TokenError> {
        self.token_codec.issue(subject, roles, self.token_ttl)
    }

    /// Validate a token and return the identity it carries.
    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedIdentity, TokenError> {
        self.token_codec.verify(token)
    }
}
