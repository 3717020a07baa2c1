use auth::AuthenticatedIdentity;
use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::customer::models::Role;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Identity of the caller, attached to the request for its duration only.
#[derive(Debug, Clone)]
pub struct AuthenticatedCustomer(pub AuthenticatedIdentity);

impl AuthenticatedCustomer {
    pub fn email(&self) -> &str {
        &self.0.subject
    }
}

/// Authentication gate for every protected route.
///
/// Verifies the bearer token before any handler runs. Nothing is looked up in
/// the registry: a correctly signed, unexpired token is sufficient.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req)?;

    let identity = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Token validation failed");
        ApiError::Unauthorized(e.to_string())
    })?;

    if !identity.has_role(Role::User.as_str()) {
        tracing::warn!(roles = ?identity.roles, "Token lacks the USER role");
        return Err(ApiError::Forbidden(
            "Insufficient role for this operation".to_string(),
        ));
    }

    req.extensions_mut()
        .insert(AuthenticatedCustomer(identity));

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, ApiError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::Unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
        )
    })
}
