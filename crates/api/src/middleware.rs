//! Authenticate stage of the access gate, plus the session cookie format.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use rolegate_auth::{SessionValidator, SESSION_TTL_SECS};

use crate::app::errors::ApiError;
use crate::context::PrincipalContext;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "token";

#[derive(Clone)]
pub struct AuthState {
    pub sessions: Arc<dyn SessionValidator>,
}

/// Verify the `token` cookie and attach the principal.
///
/// No cookie → 401. Any verification failure (signature, format, expiry) → 403.
pub async fn authenticate(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = {
        let token = session_token(req.headers()).ok_or(ApiError::MissingToken)?;
        state.sessions.validate(token, Utc::now()).map_err(|e| {
            tracing::warn!(error = %e, expired = e.is_expired(), "session token rejected");
            ApiError::TokenInvalid
        })?
    };

    req.extensions_mut()
        .insert(PrincipalContext::new(claims.principal()));

    Ok(next.run(req).await)
}

/// Find the session token among the request's cookies.
///
/// An empty value counts as absent.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value for a freshly issued token.
pub fn session_cookie(token: &str) -> Result<HeaderValue, axum::http::header::InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={token}; Max-Age={SESSION_TTL_SECS}; Path=/; HttpOnly"
    ))
}
