//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection, token keys, startup seeding
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: error taxonomy and JSON error responses

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::get,
    Extension, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware::{self, AuthState};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
///
/// `cors_origin` is the only origin allowed to make credentialed requests.
pub fn build_app(services: Arc<AppServices>, cors_origin: HeaderValue) -> Router {
    let auth_state = AuthState {
        sessions: services.tokens.clone(),
    };

    // Protected routes: authenticate first, then each route's role check.
    let protected = routes::protected_router()
        .route_layer(from_fn_with_state(auth_state, middleware::authenticate));

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([cors_origin]))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::public_router())
        .merge(protected)
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}
