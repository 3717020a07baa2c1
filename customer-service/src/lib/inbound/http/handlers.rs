use std::collections::BTreeSet;

use axum::http::header;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::customer::errors::CustomerError;
use crate::customer::errors::ErrorKind;
use crate::customer::models::Customer;
use crate::customer::models::Gender;
use crate::customer::models::Role;

pub mod authenticate;
pub mod delete_customer;
pub mod get_customer;
pub mod list_customers;
pub mod register_customer;
pub mod update_customer;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Successful response whose token travels in the `Authorization` header,
/// never in the body.
#[derive(Debug, Clone)]
pub struct TokenIssued<T: Serialize + PartialEq> {
    pub token: String,
    pub success: ApiSuccess<T>,
}

impl<T: Serialize + PartialEq> IntoResponse for TokenIssued<T> {
    fn into_response(self) -> Response {
        match HeaderValue::from_str(&self.token) {
            Ok(value) => ([(header::AUTHORIZATION, value)], self.success).into_response(),
            Err(e) => ApiError::InternalServerError(format!("Unusable token header: {}", e))
                .into_response(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    StorageFailure(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::InternalServerError(_) => ErrorKind::Internal,
            ApiError::StorageFailure(_) => ErrorKind::StorageError,
            ApiError::UnprocessableEntity(_) | ApiError::BadRequest(_) => {
                ErrorKind::RequestValidation
            }
            ApiError::NotFound(_) => ErrorKind::ResourceNotFound,
            ApiError::Conflict(_) => ErrorKind::DuplicateResource,
            ApiError::Unauthorized(_) => ErrorKind::AuthenticationFailure,
            ApiError::Forbidden(_) => ErrorKind::AuthorizationFailure,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let (status, message) = match self {
            ApiError::InternalServerError(msg) | ApiError::StorageFailure(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, kind, message))).into_response()
    }
}

impl From<CustomerError> for ApiError {
    fn from(err: CustomerError) -> Self {
        match err {
            CustomerError::NotFound(_) | CustomerError::NotFoundByEmail(_) => {
                ApiError::NotFound(err.to_string())
            }
            CustomerError::DuplicateEmail(_) => ApiError::Conflict(err.to_string()),
            CustomerError::NoChanges | CustomerError::InvalidEmail(_) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            CustomerError::InvalidCustomerId(_) => ApiError::BadRequest(err.to_string()),
            CustomerError::Storage(_) => ApiError::StorageFailure(err.to_string()),
            CustomerError::Credential(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, kind: ErrorKind, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData {
                kind: kind.as_str(),
                message,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub kind: &'static str,
    pub message: String,
}

/// Customer as exposed over the wire; the password digest is not a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerView {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub username: String,
    pub age: i32,
    pub gender: Gender,
    pub roles: BTreeSet<Role>,
}

impl From<&Customer> for CustomerView {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id.0,
            name: customer.name.clone(),
            email: customer.email.as_str().to_string(),
            username: customer.email.as_str().to_string(),
            age: customer.age,
            gender: customer.gender,
            roles: customer.roles.clone(),
        }
    }
}
