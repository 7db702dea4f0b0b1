use axum::{extract::Extension, middleware::from_fn_with_state, routing::get, Json, Router};

use rolegate_auth::Role;

use crate::app::dto::DashboardResponse;
use crate::authz::{require_roles, RequiredRoles};
use crate::context::PrincipalContext;

/// Any role at all opens the dashboard; only an empty role set is turned away.
pub const DASHBOARD_ROLES: &[Role] = &[Role::Reader, Role::Creator, Role::Admin];

pub fn router() -> Router {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route_layer(from_fn_with_state(RequiredRoles(DASHBOARD_ROLES), require_roles))
}

/// GET /dashboard - echo the caller's roles
pub async fn dashboard(Extension(principal): Extension<PrincipalContext>) -> Json<DashboardResponse> {
    Json(DashboardResponse {
        role: principal.roles().to_vec(),
    })
}
