use std::sync::Arc;

use async_trait::async_trait;
use auth::CredentialStore;

use super::errors::CustomerError;
use super::models::Customer;
use super::models::CustomerId;
use super::models::EmailAddress;
use super::models::NewCustomer;
use super::models::RegisterCustomerCommand;
use super::models::Role;
use super::models::UpdateCustomerCommand;
use super::ports::CustomerRegistry;
use super::ports::CustomerServicePort;

/// Domain service implementation for customer operations.
///
/// Generic over the registry backend and the credential store so both are
/// chosen by whoever composes the service.
pub struct CustomerService<CR, CS>
where
    CR: CustomerRegistry,
    CS: CredentialStore,
{
    registry: Arc<CR>,
    credential_store: Arc<CS>,
}

impl<CR, CS> CustomerService<CR, CS>
where
    CR: CustomerRegistry,
    CS: CredentialStore,
{
    /// Create a new customer service with injected dependencies.
    ///
    /// # Arguments
    /// * `registry` - Customer data-access implementation
    /// * `credential_store` - Password hashing implementation
    pub fn new(registry: Arc<CR>, credential_store: Arc<CS>) -> Self {
        Self {
            registry,
            credential_store,
        }
    }
}

#[async_trait]
impl<CR, CS> CustomerServicePort for CustomerService<CR, CS>
where
    CR: CustomerRegistry,
    CS: CredentialStore,
{
    async fn register_customer(
        &self,
        command: RegisterCustomerCommand,
    ) -> Result<Customer, CustomerError> {
        // Fast path only: the registry rejects a lost race on insert.
        if self.registry.exists_by_email(&command.email).await? {
            return Err(CustomerError::DuplicateEmail(command.email.to_string()));
        }

        let password_digest = self.credential_store.hash(&command.password)?;

        let customer = NewCustomer {
            name: command.name,
            email: command.email,
            password_digest,
            age: command.age,
            gender: command.gender,
            roles: Role::defaults(),
        };

        let created = self.registry.insert(customer).await?;
        tracing::info!(customer_id = %created.id, "Customer registered");

        Ok(created)
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Customer, CustomerError> {
        self.registry
            .find_by_id(id)
            .await?
            .ok_or(CustomerError::NotFound(id))
    }

    async fn get_customer_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Customer, CustomerError> {
        self.registry
            .find_by_email(email)
            .await?
            .ok_or_else(|| CustomerError::NotFoundByEmail(email.to_string()))
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, CustomerError> {
        Ok(self.registry.list_all().await?)
    }

    async fn update_customer(
        &self,
        id: CustomerId,
        command: UpdateCustomerCommand,
    ) -> Result<(), CustomerError> {
        let mut customer = self.get_customer(id).await?;
        let mut changed = false;

        if let Some(name) = command.name {
            if name != customer.name {
                customer.name = name;
                changed = true;
            }
        }

        if let Some(age) = command.age {
            if age != customer.age {
                customer.age = age;
                changed = true;
            }
        }

        // Only a real change is checked for ownership; the customer's own
        // email always "exists".
        if let Some(email) = command.email {
            if email != customer.email {
                if self.registry.exists_by_email(&email).await? {
                    return Err(CustomerError::DuplicateEmail(email.to_string()));
                }
                customer.email = email;
                changed = true;
            }
        }

        if !changed {
            return Err(CustomerError::NoChanges);
        }

        self.registry.update(customer).await?;
        tracing::info!(customer_id = %id, "Customer updated");

        Ok(())
    }

    async fn delete_customer(&self, id: CustomerId) -> Result<(), CustomerError> {
        if !self.registry.exists_by_id(id).await? {
            return Err(CustomerError::NotFound(id));
        }

        self.registry.delete_by_id(id).await?;
        tracing::info!(customer_id = %id, "Customer deleted");

        Ok(())
    }
}
