//! Authorize stage of the access gate.
//!
//! Runs after `middleware::authenticate` and checks the route's required role
//! set against the principal's roles.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use rolegate_auth::{authorize, Role};

use crate::app::errors::ApiError;
use crate::context::PrincipalContext;

/// Per-route role requirement: any one of these roles grants access.
#[derive(Debug, Clone, Copy)]
pub struct RequiredRoles(pub &'static [Role]);

pub async fn require_roles(
    State(RequiredRoles(required)): State<RequiredRoles>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Only reachable without a principal if the authenticate layer is missing.
    let principal = req
        .extensions()
        .get::<PrincipalContext>()
        .ok_or(ApiError::MissingToken)?;

    authorize(principal.principal(), required).map_err(|e| {
        tracing::warn!(
            principal_id = %principal.principal_id(),
            error = %e,
            "role check failed"
        );
        ApiError::RoleForbidden
    })?;

    Ok(next.run(req).await)
}
