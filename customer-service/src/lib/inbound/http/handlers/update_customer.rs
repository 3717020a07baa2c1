use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::customer::models::CustomerId;
use crate::domain::customer::models::EmailAddress;
use crate::domain::customer::models::UpdateCustomerCommand;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedCustomer;
use crate::inbound::http::router::AppState;
use crate::customer::errors::CustomerError;
use crate::customer::errors::EmailError;

/// HTTP request body for a partial update (raw JSON).
///
/// A field left out of the JSON is absent and not a candidate for change.
#[derive(Debug, Deserialize)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
enum ParseUpdateCustomerRequestError {
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Name must not be blank")]
    BlankName,

    #[error("Age must not be negative, got {0}")]
    NegativeAge(i32),
}

impl UpdateCustomerRequest {
    /// Supplied fields must satisfy the same rules as at registration.
    fn try_into_command(self) -> Result<UpdateCustomerCommand, ParseUpdateCustomerRequestError> {
        if self.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(ParseUpdateCustomerRequestError::BlankName);
        }
        if let Some(age) = self.age.filter(|age| *age < 0) {
            return Err(ParseUpdateCustomerRequestError::NegativeAge(age));
        }
        let email = self.email.map(EmailAddress::new).transpose()?;

        Ok(UpdateCustomerCommand {
            name: self.name,
            email,
            age: self.age,
        })
    }
}

impl From<ParseUpdateCustomerRequestError> for ApiError {
    fn from(err: ParseUpdateCustomerRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

pub async fn update_customer(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedCustomer>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCustomerRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    // Parse customer ID and request at HTTP boundary - errors automatically converted
    let customer_id = CustomerId::from_string(&id).map_err(CustomerError::from)?;
    let command = req.try_into_command()?;

    tracing::debug!(customer_id = %customer_id, requested_by = caller.email(), "Updating customer");

    state
        .customer_service
        .update_customer(customer_id, command)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}
