use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::CustomerView;
use crate::domain::customer::models::CustomerId;
use crate::inbound::http::router::AppState;

pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<ApiSuccess<CustomerView>, ApiError> {
    let customer_id =
        CustomerId::from_string(&customer_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .customer_service
        .get_customer(customer_id)
        .await
        .map_err(ApiError::from)
        .map(|ref customer| ApiSuccess::new(StatusCode::OK, customer.into()))
}
