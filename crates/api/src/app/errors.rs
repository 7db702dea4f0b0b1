use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use rolegate_infra::AccountError;

pub const SIGNUP_FAILED: &str = "Something went wrong while saving data";
pub const LOGIN_FAILED: &str = "Something went wrong while logging in";

/// Every way a request can fail, with its HTTP mapping.
///
/// Messages are short and fixed; internal detail is logged, never returned.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed body, unknown role, empty role set (400).
    Validation(String),
    /// Signup with an email that is already taken (400).
    DuplicateKey,
    /// Unknown email or wrong password (401).
    InvalidCredentials,
    /// No `token` cookie on a protected route (401).
    MissingToken,
    /// Bad signature, malformed or expired token (403).
    TokenInvalid,
    /// Authenticated, but none of the route's roles (403).
    RoleForbidden,
    /// Persistence or other server-side failure (500), with the route's message.
    StoreUnavailable(&'static str),
}

impl ApiError {
    /// Map an account failure; `server_message` is what a 500 says on this route.
    pub fn from_account(err: AccountError, server_message: &'static str) -> Self {
        match err {
            AccountError::DuplicateEmail => ApiError::DuplicateKey,
            AccountError::InvalidCredentials => ApiError::InvalidCredentials,
            AccountError::Validation(e) => ApiError::Validation(e.to_string()),
            AccountError::Store(e) => {
                tracing::error!(error = %e, "user store failure");
                ApiError::StoreUnavailable(server_message)
            }
            AccountError::Password(e) => {
                tracing::error!(error = %e, "password hashing failure");
                ApiError::StoreUnavailable(server_message)
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::DuplicateKey => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::MissingToken => StatusCode::UNAUTHORIZED,
            ApiError::TokenInvalid | ApiError::RoleForbidden => StatusCode::FORBIDDEN,
            ApiError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Validation(msg) => json_error(status, "validation_error", msg),
            ApiError::DuplicateKey => json_error(status, "duplicate_key", "Email already in use"),
            ApiError::InvalidCredentials => {
                json_error(status, "invalid_credentials", "Invalid email or password")
            }
            ApiError::MissingToken => json_error(status, "missing_token", "Unauthorized"),
            ApiError::TokenInvalid => json_error(status, "token_invalid", "Forbidden"),
            ApiError::RoleForbidden => json_error(status, "forbidden", "Forbidden"),
            ApiError::StoreUnavailable(msg) => json_error(status, "store_unavailable", msg),
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolegate_infra::UserStoreError;

    #[test]
    fn taxonomy_status_codes() {
        assert_eq!(ApiError::DuplicateKey.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::MissingToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::TokenInvalid.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::RoleForbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::StoreUnavailable(SIGNUP_FAILED).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_failures_keep_the_route_message() {
        let err = ApiError::from_account(
            AccountError::Store(UserStoreError::Unavailable("pool timed out".to_string())),
            LOGIN_FAILED,
        );
        assert!(matches!(err, ApiError::StoreUnavailable(LOGIN_FAILED)));
    }
}
