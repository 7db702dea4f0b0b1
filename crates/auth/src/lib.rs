//! `rolegate-auth`: authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it knows how to
//! hash passwords, mint and verify session tokens, and decide role membership,
//! but not where users live or how tokens travel.

pub mod authorize;
pub mod claims;
pub mod password;
pub mod principal;
pub mod roles;
pub mod token;
pub mod user;

pub use authorize::{authorize, AuthzError};
pub use claims::{
    validate_claims, SessionClaims, TokenValidationError, ISSUED_AT_SKEW_SECS, SESSION_TTL_SECS,
};
pub use password::{PasswordError, PasswordHasher};
pub use principal::Principal;
pub use roles::Role;
pub use token::{Hs256SessionTokens, IssuedToken, SessionKeys, SessionValidator, TokenError};
pub use user::{NewUser, UserRecord};
