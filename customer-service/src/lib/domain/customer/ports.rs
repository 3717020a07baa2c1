use async_trait::async_trait;

use super::errors::CustomerError;
use super::errors::StorageError;
use super::models::Customer;
use super::models::CustomerId;
use super::models::EmailAddress;
use super::models::NewCustomer;
use super::models::RegisterCustomerCommand;
use super::models::UpdateCustomerCommand;

/// Port for customer domain service operations.
#[async_trait]
pub trait CustomerServicePort: Send + Sync + 'static {
    /// Register a new customer.
    ///
    /// # Arguments
    /// * `command` - Validated command containing profile and plaintext password
    ///
    /// # Returns
    /// Stored customer with its assigned id and the default `USER` role
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered (checked up front or
    ///   rejected late by the registry)
    /// * `Credential` - Password hashing failed
    /// * `Storage` - Registry operation failed
    async fn register_customer(
        &self,
        command: RegisterCustomerCommand,
    ) -> Result<Customer, CustomerError>;

    /// Retrieve customer by identifier.
    ///
    /// # Errors
    /// * `NotFound` - Customer does not exist
    /// * `Storage` - Registry operation failed
    async fn get_customer(&self, id: CustomerId) -> Result<Customer, CustomerError>;

    /// Retrieve customer by email, used by the login path.
    ///
    /// # Errors
    /// * `NotFoundByEmail` - No customer owns this email
    /// * `Storage` - Registry operation failed
    async fn get_customer_by_email(&self, email: &EmailAddress)
        -> Result<Customer, CustomerError>;

    /// Retrieve all customers.
    async fn list_customers(&self) -> Result<Vec<Customer>, CustomerError>;

    /// Apply a partial update.
    ///
    /// # Errors
    /// * `NotFound` - Customer does not exist
    /// * `DuplicateEmail` - New email is owned by another customer
    /// * `NoChanges` - Every present field equals its current value
    /// * `Storage` - Registry operation failed
    async fn update_customer(
        &self,
        id: CustomerId,
        command: UpdateCustomerCommand,
    ) -> Result<(), CustomerError>;

    /// Delete existing customer.
    ///
    /// # Errors
    /// * `NotFound` - Customer does not exist
    /// * `Storage` - Registry operation failed
    async fn delete_customer(&self, id: CustomerId) -> Result<(), CustomerError>;
}

/// Data-access contract over customer records.
///
/// Every backend must enforce email uniqueness atomically with its writes and
/// report a lost race as `StorageError::UniqueViolation`.
#[async_trait]
pub trait CustomerRegistry: Send + Sync + 'static {
    /// Retrieve all customers.
    async fn list_all(&self) -> Result<Vec<Customer>, StorageError>;

    /// Retrieve customer by identifier.
    ///
    /// # Returns
    /// Optional customer (None if not found)
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StorageError>;

    /// Retrieve customer by exact (case-sensitive) email.
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Customer>, StorageError>;

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, StorageError>;

    async fn exists_by_id(&self, id: CustomerId) -> Result<bool, StorageError>;

    /// Persist a new customer and assign its id.
    ///
    /// # Errors
    /// * `UniqueViolation` - Email is already owned by a stored customer
    /// * `Backend` - Storage operation failed
    async fn insert(&self, customer: NewCustomer) -> Result<Customer, StorageError>;

    /// Remove a customer. Deleting an absent id is not an error.
    async fn delete_by_id(&self, id: CustomerId) -> Result<(), StorageError>;

    /// Write the fields of `customer` that differ from the stored record.
    ///
    /// Name, email, password digest and age are compared and written
    /// independently; untouched fields are never rewritten.
    ///
    /// # Errors
    /// * `MissingRecord` - No stored customer with this id
    /// * `UniqueViolation` - New email is owned by another customer
    /// * `Backend` - Storage operation failed
    async fn update(&self, customer: Customer) -> Result<(), StorageError>;
}
