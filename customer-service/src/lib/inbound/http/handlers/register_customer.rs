use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::CustomerView;
use super::TokenIssued;
use crate::domain::customer::models::EmailAddress;
use crate::domain::customer::models::Gender;
use crate::domain::customer::models::RegisterCustomerCommand;
use crate::domain::customer::models::Role;
use crate::inbound::http::router::AppState;
use crate::customer::errors::EmailError;

/// Register a customer and hand back a token for the new identity.
pub async fn register_customer(
    State(state): State<AppState>,
    Json(body): Json<RegisterCustomerRequest>,
) -> Result<TokenIssued<CustomerView>, ApiError> {
    let customer = state
        .customer_service
        .register_customer(body.try_into_command()?)
        .await?;

    let token = state
        .authenticator
        .issue_token(customer.email.as_str(), &Role::names(&customer.roles))
        .map_err(|e| ApiError::InternalServerError(format!("Token generation failed: {}", e)))?;

    Ok(TokenIssued {
        token,
        success: ApiSuccess::new(StatusCode::CREATED, (&customer).into()),
    })
}

/// HTTP request body for registering a customer (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterCustomerRequest {
    name: String,
    email: String,
    password: String,
    age: i32,
    gender: Gender,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterCustomerRequestError {
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Name must not be blank")]
    BlankName,

    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("Age must not be negative, got {0}")]
    NegativeAge(i32),
}

impl RegisterCustomerRequest {
    fn try_into_command(self) -> Result<RegisterCustomerCommand, ParseRegisterCustomerRequestError> {
        if self.name.trim().is_empty() {
            return Err(ParseRegisterCustomerRequestError::BlankName);
        }
        if self.password.is_empty() {
            return Err(ParseRegisterCustomerRequestError::EmptyPassword);
        }
        if self.age < 0 {
            return Err(ParseRegisterCustomerRequestError::NegativeAge(self.age));
        }
        let email = EmailAddress::new(self.email)?;

        Ok(RegisterCustomerCommand::new(
            self.name,
            email,
            self.password,
            self.age,
            self.gender,
        ))
    }
}

impl From<ParseRegisterCustomerRequestError> for ApiError {
    fn from(err: ParseRegisterCustomerRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
