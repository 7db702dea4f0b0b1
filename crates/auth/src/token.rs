//! Session token minting and verification (HS256 JWT).
//!
//! The signing secret is handed in once at startup and lives inside
//! [`SessionKeys`]; nothing here reads ambient global state.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::claims::{validate_claims, SessionClaims, TokenValidationError};
use crate::Principal;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Bad signature, wrong algorithm, truncated or otherwise undecodable token.
    #[error("invalid token: {0}")]
    Invalid(String),

    #[error(transparent)]
    Claims(#[from] TokenValidationError),

    #[error("failed to sign token: {0}")]
    Encode(String),
}

impl TokenError {
    pub fn is_expired(&self) -> bool {
        matches!(self, TokenError::Claims(TokenValidationError::Expired))
    }
}

/// Symmetric key material for session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

impl core::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SessionKeys(..)")
    }
}

/// A freshly minted token plus the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: SessionClaims,
}

/// Verification side of the session token contract.
///
/// The HTTP gate holds this as `Arc<dyn SessionValidator>`.
pub trait SessionValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError>;
}

/// HS256 session token issuer/verifier.
#[derive(Debug, Clone)]
pub struct Hs256SessionTokens {
    keys: SessionKeys,
}

impl Hs256SessionTokens {
    pub fn new(keys: SessionKeys) -> Self {
        Self { keys }
    }

    pub fn from_secret(secret: impl AsRef<[u8]>) -> Self {
        Self::new(SessionKeys::from_secret(secret.as_ref()))
    }

    /// Mint a token for `principal`, expiring 15 minutes after `now`.
    pub fn issue(&self, principal: &Principal, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let claims = SessionClaims::for_principal(principal, now);
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| TokenError::Encode(e.to_string()))?;
        Ok(IssuedToken { token, claims })
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by `validate_claims` against an explicit clock.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "iat", "exp"]);
        validation
    }
}

impl SessionValidator for Hs256SessionTokens {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.keys.decoding, &Self::validation())
            .map_err(|e| TokenError::Invalid(e.to_string()))?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;
    use chrono::Duration;
    use rolegate_core::UserId;

    fn tokens() -> Hs256SessionTokens {
        Hs256SessionTokens::from_secret("unit-test-secret")
    }

    fn alice() -> Principal {
        Principal::new(UserId::new(), vec![Role::Reader, Role::Creator])
    }

    #[test]
    fn issued_token_verifies_and_carries_roles() {
        let tokens = tokens();
        let principal = alice();
        let now = Utc::now();

        let issued = tokens.issue(&principal, now).unwrap();
        assert_eq!(issued.token.split('.').count(), 3);

        let claims = tokens.validate(&issued.token, now).unwrap();
        assert_eq!(claims.sub, principal.id);
        assert_eq!(claims.roles, principal.roles);
        assert_eq!(claims.principal(), principal);
    }

    #[test]
    fn token_is_rejected_after_fifteen_minutes() {
        let tokens = tokens();
        let now = Utc::now();
        let issued = tokens.issue(&alice(), now).unwrap();

        assert!(tokens.validate(&issued.token, now + Duration::minutes(14)).is_ok());

        let err = tokens
            .validate(&issued.token, now + Duration::minutes(15))
            .unwrap_err();
        assert!(err.is_expired());
    }

    #[test]
    fn token_signed_with_another_secret_is_invalid() {
        let now = Utc::now();
        let foreign = Hs256SessionTokens::from_secret("someone-else").issue(&alice(), now).unwrap();

        let err = tokens().validate(&foreign.token, now).unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn tampered_payload_is_invalid() {
        let tokens = tokens();
        let now = Utc::now();
        let issued = tokens.issue(&alice(), now).unwrap();

        let mut parts: Vec<&str> = issued.token.split('.').collect();
        let admin = tokens
            .issue(&Principal::new(UserId::new(), vec![Role::Admin]), now)
            .unwrap();
        let admin_payload = admin.token.split('.').nth(1).unwrap().to_string();
        parts[1] = &admin_payload;
        let forged = parts.join(".");

        assert!(matches!(tokens.validate(&forged, now), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn garbage_is_invalid_not_expired() {
        let err = tokens().validate("not-a-jwt", Utc::now()).unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
        assert!(!err.is_expired());
    }
}
