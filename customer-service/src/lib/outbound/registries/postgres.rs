use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::customer::errors::StorageError;
use crate::domain::customer::models::Customer;
use crate::domain::customer::models::CustomerId;
use crate::domain::customer::models::EmailAddress;
use crate::domain::customer::models::Gender;
use crate::domain::customer::models::NewCustomer;
use crate::domain::customer::models::Role;
use crate::domain::customer::ports::CustomerRegistry;

const EMAIL_UNIQUE_CONSTRAINT: &str = "customer_email_unique";

/// Durable registry backed by PostgreSQL.
///
/// Email uniqueness is enforced by the `customer_email_unique` constraint, so
/// a check-then-act race lost by the service surfaces here as a
/// `UniqueViolation`.
pub struct PostgresCustomerRegistry {
    pool: PgPool,
}

impl PostgresCustomerRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i64,
    name: String,
    email: String,
    password_digest: String,
    age: i32,
    gender: String,
    roles: Vec<String>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = StorageError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let email = EmailAddress::new(row.email).map_err(corrupt_row)?;
        let gender = row.gender.parse::<Gender>().map_err(corrupt_row)?;
        let roles = row
            .roles
            .iter()
            .map(|role| role.parse::<Role>())
            .collect::<Result<BTreeSet<_>, _>>()
            .map_err(corrupt_row)?;

        Ok(Customer {
            id: CustomerId(row.id),
            name: row.name,
            email,
            password_digest: row.password_digest,
            age: row.age,
            gender,
            roles,
        })
    }
}

fn corrupt_row(e: impl std::fmt::Display) -> StorageError {
    StorageError::Backend(format!("Corrupt customer row: {}", e))
}

fn backend_error(e: sqlx::Error) -> StorageError {
    tracing::error!(error = %e, database = "postgresql", "Registry query failed");
    StorageError::Backend(e.to_string())
}

/// Classify a failed write that touched the email column.
fn write_error(e: sqlx::Error, email: &EmailAddress) -> StorageError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT) {
            return StorageError::UniqueViolation(email.to_string());
        }
    }
    backend_error(e)
}

#[async_trait]
impl CustomerRegistry for PostgresCustomerRegistry {
    async fn list_all(&self) -> Result<Vec<Customer>, StorageError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, name, email, password_digest, age, gender, roles
            FROM customer
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(backend_error)?;

        rows.into_iter().map(Customer::try_from).collect()
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StorageError> {
        sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, name, email, password_digest, age, gender, roles
            FROM customer
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend_error)?
        .map(Customer::try_from)
        .transpose()
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Customer>, StorageError> {
        sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, name, email, password_digest, age, gender, roles
            FROM customer
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend_error)?
        .map(Customer::try_from)
        .transpose()
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, StorageError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM customer WHERE email = $1)")
            .bind(email.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(backend_error)
    }

    async fn exists_by_id(&self, id: CustomerId) -> Result<bool, StorageError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM customer WHERE id = $1)")
            .bind(id.0)
            .fetch_one(&self.pool)
            .await
            .map_err(backend_error)
    }

    async fn insert(&self, customer: NewCustomer) -> Result<Customer, StorageError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO customer (name, email, password_digest, age, gender, roles)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&customer.name)
        .bind(customer.email.as_str())
        .bind(&customer.password_digest)
        .bind(customer.age)
        .bind(customer.gender.as_str())
        .bind(Role::names(&customer.roles))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, &customer.email))?;

        Ok(customer.with_id(CustomerId(id)))
    }

    async fn delete_by_id(&self, id: CustomerId) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM customer WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(backend_error)?;

        if result.rows_affected() == 0 {
            tracing::debug!(customer_id = %id, "Delete of absent customer ignored");
        }

        Ok(())
    }

    async fn update(&self, customer: Customer) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(backend_error)?;

        // Lock the row so the per-column diff is taken against what we write over.
        let current: Customer = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, name, email, password_digest, age, gender, roles
            FROM customer
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(customer.id.0)
        .fetch_optional(&mut *tx)
        .await
        .map_err(backend_error)?
        .ok_or(StorageError::MissingRecord(customer.id))?
        .try_into()?;

        if current.name != customer.name {
            sqlx::query("UPDATE customer SET name = $1 WHERE id = $2")
                .bind(&customer.name)
                .bind(customer.id.0)
                .execute(&mut *tx)
                .await
                .map_err(backend_error)?;
        }

        if current.email != customer.email {
            sqlx::query("UPDATE customer SET email = $1 WHERE id = $2")
                .bind(customer.email.as_str())
                .bind(customer.id.0)
                .execute(&mut *tx)
                .await
                .map_err(|e| write_error(e, &customer.email))?;
        }

        if current.password_digest != customer.password_digest {
            sqlx::query("UPDATE customer SET password_digest = $1 WHERE id = $2")
                .bind(&customer.password_digest)
                .bind(customer.id.0)
                .execute(&mut *tx)
                .await
                .map_err(backend_error)?;
        }

        if current.age != customer.age {
            sqlx::query("UPDATE customer SET age = $1 WHERE id = $2")
                .bind(customer.age)
                .bind(customer.id.0)
                .execute(&mut *tx)
                .await
                .map_err(backend_error)?;
        }

        tx.commit().await.map_err(backend_error)
    }
}
