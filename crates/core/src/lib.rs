//! `rolegate-core`: shared domain primitives.
//!
//! Pure types only: no storage, no transport.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::UserId;
