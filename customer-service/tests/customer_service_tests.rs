use std::sync::Arc;

use auth::CredentialStore;
use auth::PasswordError;
use customer_service::domain::customer::errors::CustomerError;
use customer_service::domain::customer::models::EmailAddress;
use customer_service::domain::customer::models::Gender;
use customer_service::domain::customer::models::RegisterCustomerCommand;
use customer_service::domain::customer::ports::CustomerServicePort;
use customer_service::domain::customer::service::CustomerService;
use customer_service::outbound::registries::InMemoryCustomerRegistry;

/// Reversible stand-in for argon2 so racing tasks reach the registry together
struct PlainCredentialStore;

impl CredentialStore for PlainCredentialStore {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        Ok(format!("plain:{}", password))
    }

    fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordError> {
        Ok(digest == format!("plain:{}", password))
    }
}

fn service() -> Arc<CustomerService<InMemoryCustomerRegistry, PlainCredentialStore>> {
    Arc::new(CustomerService::new(
        Arc::new(InMemoryCustomerRegistry::new()),
        Arc::new(PlainCredentialStore),
    ))
}

fn command(name: &str, email: &str) -> RegisterCustomerCommand {
    RegisterCustomerCommand::new(
        name.to_string(),
        EmailAddress::new(email.to_string()).unwrap(),
        "pw".to_string(),
        21,
        Gender::Male,
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registrations_keep_email_unique() {
    let service = service();

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .register_customer(command(&format!("Racer {}", i), "race@x.com"))
                    .await
            })
        })
        .collect();

    let results = futures::future::join_all(handles).await;

    let mut registered = 0;
    for result in results {
        match result.unwrap() {
            Ok(_) => registered += 1,
            Err(err) => assert!(matches!(err, CustomerError::DuplicateEmail(ref e) if e == "race@x.com")),
        }
    }

    assert_eq!(registered, 1);
    assert_eq!(service.list_customers().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_services_do_not_share_state() {
    let first = service();
    let second = service();

    first.register_customer(command("Alex", "alex@x.com")).await.unwrap();

    assert!(second.list_customers().await.unwrap().is_empty());
    assert!(second.register_customer(command("Alex", "alex@x.com")).await.is_ok());
}

#[tokio::test]
async fn test_digest_is_stored_instead_of_password() {
    let service = service();

    let customer = service.register_customer(command("Alex", "alex@x.com")).await.unwrap();

    assert_eq!(customer.password_digest, "plain:pw");
    assert!(PlainCredentialStore.verify("pw", &customer.password_digest).unwrap());
}
