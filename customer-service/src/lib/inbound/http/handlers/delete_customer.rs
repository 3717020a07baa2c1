use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::domain::customer::models::CustomerId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedCustomer;
use crate::inbound::http::router::AppState;
use crate::customer::errors::CustomerError;

pub async fn delete_customer(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedCustomer>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let customer_id = CustomerId::from_string(&id).map_err(CustomerError::from)?;

    tracing::info!(customer_id = %customer_id, requested_by = caller.email(), "Deleting customer");

    state
        .customer_service
        .delete_customer(customer_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}
