//! User record store boundary.
//!
//! The store is the single source of truth for email uniqueness: `create`
//! either inserts atomically or reports `DuplicateKey`. Callers never run a
//! separate existence check before inserting.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use rolegate_auth::{NewUser, UserRecord};

pub use in_memory::InMemoryUserStore;
pub use postgres::PostgresUserStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserStoreError {
    /// A record with this email already exists.
    #[error("duplicate key: email '{email}' already exists")]
    DuplicateKey { email: String },

    /// The backing store could not be reached or rejected the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored row could not be decoded into a `UserRecord`.
    #[error("corrupt user record: {0}")]
    Corrupt(String),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserStoreError>;

    async fn create(&self, user: NewUser) -> Result<UserRecord, UserStoreError>;
}

#[async_trait]
impl<S> UserStore for Arc<S>
where
    S: UserStore + ?Sized,
{
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserStoreError> {
        (**self).find_by_email(email).await
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord, UserStoreError> {
        (**self).create(user).await
    }
}
