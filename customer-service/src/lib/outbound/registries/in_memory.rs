use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::customer::errors::StorageError;
use crate::domain::customer::models::Customer;
use crate::domain::customer::models::CustomerId;
use crate::domain::customer::models::EmailAddress;
use crate::domain::customer::models::NewCustomer;
use crate::domain::customer::ports::CustomerRegistry;

/// Ephemeral registry kept in process memory.
///
/// Writers take the lock exclusively and re-check email ownership under it,
/// which gives the same uniqueness guarantee as the database constraint.
/// Each instance is independent; nothing is shared between instances.
#[derive(Debug, Default)]
pub struct InMemoryCustomerRegistry {
    state: RwLock<RegistryState>,
}

#[derive(Debug, Default)]
struct RegistryState {
    last_id: i64,
    /// Keyed by id, so iteration follows insertion order.
    customers: BTreeMap<CustomerId, Customer>,
}

impl RegistryState {
    fn email_owned_by_other(&self, email: &EmailAddress, id: Option<CustomerId>) -> bool {
        self.customers
            .values()
            .any(|customer| &customer.email == email && Some(customer.id) != id)
    }
}

impl InMemoryCustomerRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerRegistry for InMemoryCustomerRegistry {
    async fn list_all(&self) -> Result<Vec<Customer>, StorageError> {
        Ok(self.state.read().await.customers.values().cloned().collect())
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StorageError> {
        Ok(self.state.read().await.customers.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Customer>, StorageError> {
        Ok(self
            .state
            .read()
            .await
            .customers
            .values()
            .find(|customer| &customer.email == email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, StorageError> {
        Ok(self.state.read().await.email_owned_by_other(email, None))
    }

    async fn exists_by_id(&self, id: CustomerId) -> Result<bool, StorageError> {
        Ok(self.state.read().await.customers.contains_key(&id))
    }

    async fn insert(&self, customer: NewCustomer) -> Result<Customer, StorageError> {
        let mut state = self.state.write().await;

        if state.email_owned_by_other(&customer.email, None) {
            return Err(StorageError::UniqueViolation(customer.email.to_string()));
        }

        state.last_id += 1;
        let stored = customer.with_id(CustomerId(state.last_id));
        state.customers.insert(stored.id, stored.clone());

        tracing::debug!(customer_id = %stored.id, registry = "in_memory", "Customer inserted");
        Ok(stored)
    }

    async fn delete_by_id(&self, id: CustomerId) -> Result<(), StorageError> {
        self.state.write().await.customers.remove(&id);
        Ok(())
    }

    async fn update(&self, customer: Customer) -> Result<(), StorageError> {
        let mut state = self.state.write().await;

        if state.email_owned_by_other(&customer.email, Some(customer.id)) {
            return Err(StorageError::UniqueViolation(customer.email.to_string()));
        }

        let stored = state
            .customers
            .get_mut(&customer.id)
            .ok_or(StorageError::MissingRecord(customer.id))?;

        if stored.name != customer.name {
            stored.name = customer.name;
        }
        if stored.email != customer.email {
            stored.email = customer.email;
        }
        if stored.password_digest != customer.password_digest {
            stored.password_digest = customer.password_digest;
        }
        if stored.age != customer.age {
            stored.age = customer.age;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::customer::models::Gender;
    use crate::domain::customer::models::Role;

    fn email(value: &str) -> EmailAddress {
        EmailAddress::new(value.to_string()).unwrap()
    }

    fn new_customer(name: &str, address: &str) -> NewCustomer {
        NewCustomer {
            name: name.to_string(),
            email: email(address),
            password_digest: "$argon2id$digest".to_string(),
            age: 21,
            gender: Gender::Female,
            roles: Role::defaults(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let registry = InMemoryCustomerRegistry::new();

        let first = registry.insert(new_customer("Alex", "alex@x.com")).await.unwrap();
        let second = registry.insert(new_customer("Jamila", "jamila@x.com")).await.unwrap();

        assert_eq!(first.id, CustomerId(1));
        assert_eq!(second.id, CustomerId(2));

        let listed = registry.list_all().await.unwrap();
        assert_eq!(listed, vec![first, second]);
    }

    #[tokio::test]
    async fn test_insert_rejects_taken_email() {
        let registry = InMemoryCustomerRegistry::new();
        registry.insert(new_customer("Alex", "alex@x.com")).await.unwrap();

        let result = registry.insert(new_customer("Other", "alex@x.com")).await;

        assert_eq!(
            result,
            Err(StorageError::UniqueViolation("alex@x.com".to_string()))
        );
        assert_eq!(registry.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_lookups() {
        let registry = InMemoryCustomerRegistry::new();
        let alex = registry.insert(new_customer("Alex", "alex@x.com")).await.unwrap();

        assert_eq!(registry.find_by_id(alex.id).await.unwrap(), Some(alex.clone()));
        assert_eq!(registry.find_by_id(CustomerId(99)).await.unwrap(), None);
        assert_eq!(
            registry.find_by_email(&email("alex@x.com")).await.unwrap(),
            Some(alex.clone())
        );
        assert!(registry.exists_by_email(&email("alex@x.com")).await.unwrap());
        assert!(!registry.exists_by_email(&email("ALEX@x.com")).await.unwrap());
        assert!(registry.exists_by_id(alex.id).await.unwrap());
        assert!(!registry.exists_by_id(CustomerId(99)).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_is_no_op_safe() {
        let registry = InMemoryCustomerRegistry::new();
        let alex = registry.insert(new_customer("Alex", "alex@x.com")).await.unwrap();

        registry.delete_by_id(alex.id).await.unwrap();
        registry.delete_by_id(alex.id).await.unwrap();

        assert!(!registry.exists_by_id(alex.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_writes_changed_fields() {
        let registry = InMemoryCustomerRegistry::new();
        let alex = registry.insert(new_customer("Alex", "alex@x.com")).await.unwrap();

        let mut changed = alex.clone();
        changed.age = 35;
        changed.email = email("alex2@x.com");
        registry.update(changed).await.unwrap();

        let stored = registry.find_by_id(alex.id).await.unwrap().unwrap();
        assert_eq!(stored.age, 35);
        assert_eq!(stored.email.as_str(), "alex2@x.com");
        assert_eq!(stored.name, alex.name);
        assert_eq!(stored.password_digest, alex.password_digest);
        assert_eq!(stored.roles, alex.roles);
    }

    #[tokio::test]
    async fn test_update_keeping_own_email_is_allowed() {
        let registry = InMemoryCustomerRegistry::new();
        let alex = registry.insert(new_customer("Alex", "alex@x.com")).await.unwrap();

        let mut renamed = alex.clone();
        renamed.name = "Alexandro".to_string();

        assert_eq!(registry.update(renamed).await, Ok(()));
    }

    #[tokio::test]
    async fn test_update_to_other_customers_email_is_rejected() {
        let registry = InMemoryCustomerRegistry::new();
        let alex = registry.insert(new_customer("Alex", "alex@x.com")).await.unwrap();
        registry.insert(new_customer("Jamila", "jamila@x.com")).await.unwrap();

        let mut stolen = alex.clone();
        stolen.email = email("jamila@x.com");

        assert_eq!(
            registry.update(stolen).await,
            Err(StorageError::UniqueViolation("jamila@x.com".to_string()))
        );
        let stored = registry.find_by_id(alex.id).await.unwrap().unwrap();
        assert_eq!(stored.email.as_str(), "alex@x.com");
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let registry = InMemoryCustomerRegistry::new();
        let ghost = new_customer("Ghost", "ghost@x.com").with_id(CustomerId(5));

        assert_eq!(
            registry.update(ghost).await,
            Err(StorageError::MissingRecord(CustomerId(5)))
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_keep_email_unique() {
        let registry = Arc::new(InMemoryCustomerRegistry::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move {
                    registry
                        .insert(new_customer(&format!("Racer {}", i), "race@x.com"))
                        .await
                })
            })
            .collect();

        let mut inserted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => inserted += 1,
                Err(err) => assert!(matches!(err, StorageError::UniqueViolation(_))),
            }
        }

        assert_eq!(inserted, 1);
        assert_eq!(registry.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_instances_are_isolated() {
        let first = InMemoryCustomerRegistry::new();
        let second = InMemoryCustomerRegistry::new();

        first.insert(new_customer("Alex", "alex@x.com")).await.unwrap();

        assert!(second.list_all().await.unwrap().is_empty());
        assert!(second.insert(new_customer("Alex", "alex@x.com")).await.is_ok());
    }
}
