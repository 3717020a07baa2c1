use auth::PasswordError;
use thiserror::Error;

use super::models::CustomerId;

/// Error for CustomerId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CustomerIdError {
    #[error("Invalid customer id: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for decoding enumerated columns
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValueError {
    #[error("Unknown gender: {0}")]
    UnknownGender(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

/// Error raised by a customer registry backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// The backend rejected a write because the email is owned by another record.
    #[error("Unique constraint violated for email: {0}")]
    UniqueViolation(String),

    /// The record to update disappeared between load and write.
    #[error("No stored customer with id {0}")]
    MissingRecord(CustomerId),

    #[error("Storage backend failure: {0}")]
    Backend(String),
}

/// Stable, machine-readable failure classification reported at the
/// operation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ResourceNotFound,
    DuplicateResource,
    RequestValidation,
    AuthenticationFailure,
    AuthorizationFailure,
    StorageError,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ResourceNotFound => "RESOURCE_NOT_FOUND",
            ErrorKind::DuplicateResource => "DUPLICATE_RESOURCE",
            ErrorKind::RequestValidation => "REQUEST_VALIDATION",
            ErrorKind::AuthenticationFailure => "AUTHENTICATION_FAILURE",
            ErrorKind::AuthorizationFailure => "AUTHORIZATION_FAILURE",
            ErrorKind::StorageError => "STORAGE_ERROR",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }
}

/// Top-level error for all customer operations
#[derive(Debug, Clone, Error)]
pub enum CustomerError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid customer ID: {0}")]
    InvalidCustomerId(#[from] CustomerIdError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Credential error: {0}")]
    Credential(#[from] PasswordError),

    // Domain-level errors
    #[error("customer with id [{0}] not found")]
    NotFound(CustomerId),

    #[error("customer with email [{0}] not found")]
    NotFoundByEmail(String),

    #[error("email [{0}] already taken")]
    DuplicateEmail(String),

    #[error("no data changes found")]
    NoChanges,

    // Infrastructure errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CustomerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CustomerError::NotFound(_) | CustomerError::NotFoundByEmail(_) => {
                ErrorKind::ResourceNotFound
            }
            CustomerError::DuplicateEmail(_) => ErrorKind::DuplicateResource,
            CustomerError::NoChanges
            | CustomerError::InvalidEmail(_)
            | CustomerError::InvalidCustomerId(_) => ErrorKind::RequestValidation,
            CustomerError::Storage(_) => ErrorKind::StorageError,
            CustomerError::Credential(_) => ErrorKind::Internal,
        }
    }
}

impl From<StorageError> for CustomerError {
    fn from(err: StorageError) -> Self {
        match err {
            // A uniqueness race lost at the storage layer is still a duplicate.
            StorageError::UniqueViolation(email) => CustomerError::DuplicateEmail(email),
            StorageError::MissingRecord(id) => CustomerError::NotFound(id),
            StorageError::Backend(message) => CustomerError::Storage(message),
        }
    }
}
