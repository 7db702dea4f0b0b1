use axum::{routing::post, Router};

pub mod accounts;
pub mod dashboard;
pub mod system;

/// Routes reachable without a session.
pub fn public_router() -> Router {
    Router::new()
        .route("/signup", post(accounts::signup))
        .route("/login", post(accounts::login))
}

/// Routes behind the access gate; each carries its own role requirement.
pub fn protected_router() -> Router {
    Router::new().merge(dashboard::router())
}
