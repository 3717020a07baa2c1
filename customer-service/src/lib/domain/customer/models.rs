use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use super::errors::CustomerIdError;
use super::errors::EmailError;
use super::errors::ValueError;

/// Customer aggregate entity.
///
/// Represents a registered customer principal. `password_digest` is the
/// one-way hash and never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: EmailAddress,
    pub password_digest: String,
    pub age: i32,
    pub gender: Gender,
    pub roles: BTreeSet<Role>,
}

/// Customer that has not been stored yet; the registry assigns its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub email: EmailAddress,
    pub password_digest: String,
    pub age: i32,
    pub gender: Gender,
    pub roles: BTreeSet<Role>,
}

impl NewCustomer {
    pub fn with_id(self, id: CustomerId) -> Customer {
        Customer {
            id,
            name: self.name,
            email: self.email,
            password_digest: self.password_digest,
            age: self.age,
            gender: self.gender,
            roles: self.roles,
        }
    }
}

/// Customer identifier assigned by the registry on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CustomerId(pub i64);

impl CustomerId {
    /// Parse a customer ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a base-10 integer
    pub fn from_string(s: &str) -> Result<Self, CustomerIdError> {
        s.parse::<i64>()
            .map(CustomerId)
            .map_err(|e| CustomerIdError::InvalidFormat(format!("{}: {}", s, e)))
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser. Comparison is
/// case-sensitive, exactly as stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
        }
    }
}

impl FromStr for Gender {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MALE" => Ok(Gender::Male),
            "FEMALE" => Ok(Gender::Female),
            other => Err(ValueError::UnknownGender(other.to_string())),
        }
    }
}

/// Flat role list; no hierarchy between roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }

    /// Role set every newly registered customer starts with.
    pub fn defaults() -> BTreeSet<Role> {
        BTreeSet::from([Role::User])
    }

    pub fn names(roles: &BTreeSet<Role>) -> Vec<String> {
        roles.iter().map(|role| role.as_str().to_string()).collect()
    }
}

impl FromStr for Role {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            other => Err(ValueError::UnknownRole(other.to_string())),
        }
    }
}

/// Command to register a new customer with domain types
#[derive(Debug)]
pub struct RegisterCustomerCommand {
    pub name: String,
    pub email: EmailAddress,
    pub password: String,
    pub age: i32,
    pub gender: Gender,
}

impl RegisterCustomerCommand {
    /// Construct a new registration command.
    ///
    /// # Arguments
    /// * `password` - Plain text password (will be hashed by service)
    pub fn new(name: String, email: EmailAddress, password: String, age: i32, gender: Gender) -> Self {
        Self {
            name,
            email,
            password,
            age,
            gender,
        }
    }
}

/// Command to partially update an existing customer.
///
/// `None` means "absent": the field is not a candidate for change. Only
/// present fields that differ from the stored value are written.
#[derive(Debug, Default)]
pub struct UpdateCustomerCommand {
    pub name: Option<String>,
    pub email: Option<EmailAddress>,
    pub age: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_id_from_string() {
        assert_eq!(CustomerId::from_string("42"), Ok(CustomerId(42)));
        assert!(CustomerId::from_string("forty-two").is_err());
        assert_eq!(CustomerId(42).to_string(), "42");
    }

    #[test]
    fn test_email_validation() {
        assert!(EmailAddress::new("alex@x.com".to_string()).is_ok());
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
    }

    #[test]
    fn test_email_is_case_sensitive() {
        let lower = EmailAddress::new("alex@x.com".to_string()).unwrap();
        let upper = EmailAddress::new("Alex@x.com".to_string()).unwrap();
        assert_ne!(lower, upper);
    }

    #[test]
    fn test_enum_round_trip_through_storage_names() {
        assert_eq!("FEMALE".parse::<Gender>(), Ok(Gender::Female));
        assert_eq!(Gender::Male.as_str(), "MALE");
        assert_eq!("ADMIN".parse::<Role>(), Ok(Role::Admin));
        assert!("ROOT".parse::<Role>().is_err());
    }

    #[test]
    fn test_default_roles() {
        let roles = Role::defaults();
        assert_eq!(Role::names(&roles), vec!["USER".to_string()]);
    }
}
