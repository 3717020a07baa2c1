use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::CustomerView;
use super::TokenIssued;
use crate::customer::errors::CustomerError;
use crate::domain::customer::models::EmailAddress;
use crate::domain::customer::models::Role;
use crate::inbound::http::router::AppState;

/// Exchange email and password for a token.
///
/// Unknown email and wrong password produce the same response after the
/// same amount of password hashing work.
pub async fn authenticate(
    State(state): State<AppState>,
    Json(body): Json<AuthenticateRequestBody>,
) -> Result<TokenIssued<CustomerView>, ApiError> {
    let lookup = match EmailAddress::new(body.username) {
        Ok(email) => state.customer_service.get_customer_by_email(&email).await,
        Err(e) => Err(CustomerError::from(e)),
    };

    let customer = match lookup {
        Ok(customer) => customer,
        Err(CustomerError::NotFoundByEmail(_) | CustomerError::InvalidEmail(_)) => {
            let rejection = state.authenticator.reject_unknown_subject(&body.password);
            return Err(ApiError::Unauthorized(rejection.to_string()));
        }
        Err(e) => return Err(ApiError::from(e)),
    };

    let result = state
        .authenticator
        .authenticate(
            &body.password,
            &customer.password_digest,
            customer.email.as_str(),
            &Role::names(&customer.roles),
        )
        .map_err(|e| match e {
            auth::AuthenticationError::InvalidCredentials => {
                tracing::warn!(customer_id = %customer.id, "Login rejected");
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            auth::AuthenticationError::PasswordError(err) => {
                ApiError::InternalServerError(format!("Password verification failed: {}", err))
            }
            auth::AuthenticationError::TokenError(err) => {
                ApiError::InternalServerError(format!("Token generation failed: {}", err))
            }
        })?;

    Ok(TokenIssued {
        token: result.access_token,
        success: ApiSuccess::new(StatusCode::OK, (&customer).into()),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthenticateRequestBody {
    username: String,
    password: String,
}
