//! Account workflows: signup and credential verification.
//!
//! Password hashing is CPU-bound and runs on tokio's blocking pool.

use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;

use rolegate_auth::{NewUser, PasswordError, PasswordHasher, Role, UserRecord};
use rolegate_core::DomainError;

use crate::users::{UserStore, UserStoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("email already in use")]
    DuplicateEmail,

    /// Unknown email or wrong password; the two are deliberately indistinguishable.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] UserStoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// Signup input, password still in plaintext.
#[derive(Debug, Clone)]
pub struct Signup {
    pub username: String,
    pub email: String,
    pub password: String,
    pub roles: Vec<Role>,
}

impl Signup {
    /// Reject input that could never become a user, before any hashing.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.username.trim().is_empty() {
            return Err(DomainError::validation("username must not be empty"));
        }
        if self.email.trim().is_empty() {
            return Err(DomainError::validation("email must not be empty"));
        }
        if self.password.is_empty() {
            return Err(DomainError::validation("password must not be empty"));
        }
        if self.roles.is_empty() {
            return Err(DomainError::validation("at least one role is required"));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
}

impl AccountService {
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    /// Register a new user.
    ///
    /// Uniqueness is left to the store: a conflicting insert comes back as
    /// `DuplicateEmail`, there is no lookup beforehand.
    #[instrument(skip(self, signup), fields(email = %signup.email), err(level = "debug"))]
    pub async fn signup(&self, signup: Signup) -> Result<UserRecord, AccountError> {
        signup.validate()?;

        let Signup {
            username,
            email,
            password,
            roles,
        } = signup;

        let password_hash = self.hash(password).await?;
        let new_user = NewUser::new(username, email, password_hash, roles)?;

        match self.store.create(new_user).await {
            Ok(record) => {
                tracing::info!(user_id = %record.id, "user created");
                Ok(record)
            }
            Err(UserStoreError::DuplicateKey { .. }) => Err(AccountError::DuplicateEmail),
            Err(e) => Err(AccountError::Store(e)),
        }
    }

    /// Check `(email, password)` against the store.
    #[instrument(skip(self, password), err(level = "debug"))]
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<UserRecord, AccountError> {
        let Some(record) = self.store.find_by_email(email).await? else {
            return Err(AccountError::InvalidCredentials);
        };

        let hasher = self.hasher.clone();
        let password = password.to_string();
        let phc = record.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &phc))
            .await
            .map_err(|e| PasswordError::Hash(format!("verify task failed: {e}")))??;

        if matches {
            Ok(record)
        } else {
            Err(AccountError::InvalidCredentials)
        }
    }

    async fn hash(&self, password: String) -> Result<String, AccountError> {
        let hasher = self.hasher.clone();
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| PasswordError::Hash(format!("hash task failed: {e}")))??;
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::InMemoryUserStore;

    fn service() -> (AccountService, Arc<InMemoryUserStore>) {
        let store = Arc::new(InMemoryUserStore::new());
        let hasher = PasswordHasher::with_params(8 * 1024, 1, 1).unwrap();
        (AccountService::new(store.clone(), hasher), store)
    }

    fn alice() -> Signup {
        Signup {
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password: "p1".to_string(),
            roles: vec![Role::Reader],
        }
    }

    #[tokio::test]
    async fn signup_stores_a_hash_not_the_password() {
        let (svc, store) = service();
        let record = svc.signup(alice()).await.unwrap();

        assert_eq!(record.username, "alice");
        assert_eq!(record.roles, vec![Role::Reader]);
        assert_ne!(record.password_hash, "p1");

        let stored = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert!(stored.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn second_signup_with_same_email_is_a_duplicate() {
        let (svc, _) = service();
        svc.signup(alice()).await.unwrap();

        let mut other = alice();
        other.username = "someone else".to_string();
        other.password = "different".to_string();
        other.roles = vec![Role::Admin];

        assert_eq!(svc.signup(other).await.unwrap_err(), AccountError::DuplicateEmail);
    }

    #[tokio::test]
    async fn signup_without_roles_is_a_validation_error() {
        let (svc, store) = service();
        let mut signup = alice();
        signup.roles.clear();

        assert!(matches!(svc.signup(signup).await, Err(AccountError::Validation(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn signup_with_empty_password_is_a_validation_error() {
        let (svc, store) = service();
        let mut signup = alice();
        signup.password.clear();

        assert!(matches!(svc.signup(signup).await, Err(AccountError::Validation(_))));
        assert!(store.is_empty());
        assert_eq!(
            svc.verify_credentials("a@x.com", "").await.unwrap_err(),
            AccountError::InvalidCredentials
        );
    }

    #[test]
    fn blank_fields_fail_validation_before_hashing() {
        let mut blank_email = alice();
        blank_email.email = "   ".to_string();
        let mut blank_username = alice();
        blank_username.username = String::new();
        let mut no_roles = alice();
        no_roles.roles.clear();

        for signup in [blank_email, blank_username, no_roles] {
            assert!(signup.validate().is_err());
        }
        assert!(alice().validate().is_ok());
    }

    #[tokio::test]
    async fn correct_credentials_return_the_record() {
        let (svc, _) = service();
        let created = svc.signup(alice()).await.unwrap();

        let record = svc.verify_credentials("a@x.com", "p1").await.unwrap();
        assert_eq!(record.id, created.id);
        assert_eq!(record.roles, created.roles);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let (svc, _) = service();
        svc.signup(alice()).await.unwrap();

        let wrong = svc.verify_credentials("a@x.com", "p2").await.unwrap_err();
        let unknown = svc.verify_credentials("nobody@x.com", "p1").await.unwrap_err();

        assert_eq!(wrong, AccountError::InvalidCredentials);
        assert_eq!(unknown, AccountError::InvalidCredentials);
    }
}
