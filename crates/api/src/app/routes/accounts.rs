use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use crate::app::dto::{CreatedUserResponse, LoginRequest, LoginResponse, SignupRequest};
use crate::app::errors::{ApiError, LOGIN_FAILED, SIGNUP_FAILED};
use crate::app::services::AppServices;
use crate::middleware::session_cookie;

/// POST /signup - register a user; the response never includes the credential
pub async fn signup(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedUserResponse>), ApiError> {
    let Json(req) = payload?;

    let record = services
        .accounts
        .signup(req.into())
        .await
        .map_err(|e| ApiError::from_account(e, SIGNUP_FAILED))?;

    Ok((StatusCode::CREATED, Json(CreatedUserResponse::from(&record))))
}

/// POST /login - verify credentials and set the session cookie
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload?;

    let record = services
        .accounts
        .verify_credentials(&req.email, &req.password)
        .await
        .map_err(|e| {
            if matches!(e, rolegate_infra::AccountError::InvalidCredentials) {
                tracing::info!(email = %req.email, "login rejected");
            }
            ApiError::from_account(e, LOGIN_FAILED)
        })?;

    let issued = services
        .tokens
        .issue(&record.principal(), Utc::now())
        .map_err(|e| {
            tracing::error!(error = %e, "failed to sign session token");
            ApiError::StoreUnavailable(LOGIN_FAILED)
        })?;

    let cookie = session_cookie(&issued.token).map_err(|e| {
        tracing::error!(error = %e, "session token is not a valid cookie value");
        ApiError::StoreUnavailable(LOGIN_FAILED)
    })?;

    tracing::info!(user_id = %record.id, "login succeeded");

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse::from(&record)),
    )
        .into_response())
}
