//! Authentication utilities library
//!
//! Provides the stateless authentication building blocks of the customer
//! service:
//! - Credential hashing (Argon2id) behind the `CredentialStore` capability
//! - Signed token issuance and verification (`TokenCodec`)
//! - Authentication coordination (`Authenticator`)
//!
//! # Examples
//!
//! ## Credential Hashing
//! ```
//! use auth::{Argon2CredentialStore, CredentialStore};
//!
//! let store = Argon2CredentialStore::new();
//! let digest = store.hash("my_password").unwrap();
//! assert!(store.verify("my_password", &digest).unwrap());
//! ```
//!
//! ## Tokens
//! ```
//! use auth::TokenCodec;
//! use chrono::Duration;
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let roles = vec!["USER".to_string()];
//! let token = codec.issue("alex@x.com", &roles, Duration::hours(1)).unwrap();
//! let identity = codec.verify(&token).unwrap();
//! assert_eq!(identity.subject, "alex@x.com");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Argon2CredentialStore, Authenticator, CredentialStore};
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(24));
//! let roles = vec!["USER".to_string()];
//!
//! // Register: hash password
//! let digest = Argon2CredentialStore::new().hash("password123").unwrap();
//!
//! // Login: verify and issue token
//! let result = auth.authenticate("password123", &digest, "alex@x.com", &roles).unwrap();
//!
//! // Every later request: validate token
//! let identity = auth.validate_token(&result.access_token).unwrap();
//! assert!(identity.has_role("USER"));
//! ```

pub mod authenticator;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use password::Argon2CredentialStore;
pub use password::CredentialStore;
pub use password::PasswordError;
pub use token::AuthenticatedIdentity;
pub use token::Claims;
pub use token::TokenCodec;
pub use token::TokenError;
