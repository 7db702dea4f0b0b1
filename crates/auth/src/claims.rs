use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rolegate_core::UserId;

use crate::{Principal, Role};

/// Lifetime of a session token (and of the cookie carrying it), in seconds.
pub const SESSION_TTL_SECS: i64 = 15 * 60;

/// How far `iat` may sit ahead of the verifier's clock.
pub const ISSUED_AT_SKEW_SECS: i64 = 60;

/// Session token claims.
///
/// Timestamps are Unix seconds so the token stays a standard JWT
/// (`iat`/`exp` as NumericDate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the user record's id.
    pub sub: UserId,

    /// Roles held at login time.
    pub roles: Vec<Role>,

    /// Issued-at timestamp.
    pub iat: i64,

    /// Expiration timestamp.
    pub exp: i64,
}

impl SessionClaims {
    /// Claims for `principal`, valid from `now` for [`SESSION_TTL_SECS`].
    pub fn for_principal(principal: &Principal, now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            sub: principal.id,
            roles: principal.roles.clone(),
            iat,
            exp: iat + SESSION_TTL_SECS,
        }
    }

    pub fn principal(&self) -> Principal {
        Principal::new(self.sub, self.roles.clone())
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (iat is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,
}

/// Deterministically validate session claims against `now`.
///
/// No leeway on expiry: a token is dead from the second `exp` is reached.
/// `iat` may be up to [`ISSUED_AT_SKEW_SECS`] in the future.
/// Signature verification happens before this, in [`crate::token`].
pub fn validate_claims(claims: &SessionClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    let now = now.timestamp();
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now + ISSUED_AT_SKEW_SECS < claims.iat {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims_at(now: DateTime<Utc>) -> SessionClaims {
        SessionClaims::for_principal(&Principal::new(UserId::new(), vec![Role::Reader]), now)
    }

    #[test]
    fn fresh_claims_are_valid_for_fifteen_minutes() {
        let now = Utc::now();
        let claims = claims_at(now);

        assert_eq!(claims.exp - claims.iat, 900);
        assert!(validate_claims(&claims, now).is_ok());
        assert!(validate_claims(&claims, now + Duration::seconds(899)).is_ok());
    }

    #[test]
    fn claims_expire_exactly_at_exp() {
        let now = Utc::now();
        let claims = claims_at(now);

        assert_eq!(
            validate_claims(&claims, now + Duration::minutes(15)),
            Err(TokenValidationError::Expired)
        );
        assert_eq!(
            validate_claims(&claims, now + Duration::hours(3)),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn future_issued_at_is_rejected() {
        let now = Utc::now();
        let claims = claims_at(now + Duration::minutes(5));
        assert_eq!(validate_claims(&claims, now), Err(TokenValidationError::NotYetValid));
    }

    #[test]
    fn small_clock_step_back_is_tolerated() {
        let now = Utc::now();
        let claims = claims_at(now + Duration::seconds(1));
        assert!(validate_claims(&claims, now).is_ok());

        let claims = claims_at(now + Duration::seconds(ISSUED_AT_SKEW_SECS));
        assert!(validate_claims(&claims, now).is_ok());

        let claims = claims_at(now + Duration::seconds(ISSUED_AT_SKEW_SECS + 1));
        assert_eq!(validate_claims(&claims, now), Err(TokenValidationError::NotYetValid));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let now = Utc::now();
        let mut claims = claims_at(now);
        claims.exp = claims.iat;
        assert_eq!(validate_claims(&claims, now), Err(TokenValidationError::InvalidTimeWindow));
    }
}
