use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::authenticate::authenticate;
use super::handlers::delete_customer::delete_customer;
use super::handlers::get_customer::get_customer;
use super::handlers::list_customers::list_customers;
use super::handlers::register_customer::register_customer;
use super::handlers::update_customer::update_customer;
use super::middleware::authenticate as auth_middleware;
use crate::domain::customer::ports::CustomerServicePort;

#[derive(Clone)]
pub struct AppState {
    /// Service over whichever registry backend was selected at startup.
    pub customer_service: Arc<dyn CustomerServicePort>,
    pub authenticator: Arc<Authenticator>,
}

pub fn create_router(
    customer_service: Arc<dyn CustomerServicePort>,
    authenticator: Arc<Authenticator>,
) -> Router {
    let state = AppState {
        customer_service,
        authenticator,
    };

    let public_routes = Router::new()
        .route("/api/v1/auth/login", post(authenticate))
        .route("/api/v1/customers", post(register_customer));

    let protected_routes = Router::new()
        .route("/api/v1/customers", get(list_customers))
        .route("/api/v1/customers/:customer_id", get(get_customer))
        .route("/api/v1/customers/:customer_id", put(update_customer))
        .route("/api/v1/customers/:customer_id", delete(delete_customer))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
