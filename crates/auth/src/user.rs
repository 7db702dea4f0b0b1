//! User records as the store sees them.

use serde::{Deserialize, Serialize};

use rolegate_core::{DomainError, DomainResult, UserId};

use crate::{Principal, Role};

/// A persisted user.
///
/// # Invariants
/// - `email` is unique across the store (enforced by the store).
/// - `password_hash` is an Argon2 PHC string, never plaintext.
/// - Records are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
}

impl UserRecord {
    pub fn principal(&self) -> Principal {
        Principal::new(self.id, self.roles.clone())
    }
}

/// A record about to be inserted. The store assigns nothing; `id` is chosen here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
}

impl NewUser {
    /// Build a validated insert.
    ///
    /// Roles are deduplicated (first occurrence wins) and must not be empty.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        roles: Vec<Role>,
    ) -> DomainResult<Self> {
        let username = username.into();
        let email = email.into();

        if username.trim().is_empty() {
            return Err(DomainError::validation("username must not be empty"));
        }
        if email.trim().is_empty() {
            return Err(DomainError::validation("email must not be empty"));
        }

        let mut unique = Vec::with_capacity(roles.len());
        for role in roles {
            if !unique.contains(&role) {
                unique.push(role);
            }
        }
        if unique.is_empty() {
            return Err(DomainError::validation("at least one role is required"));
        }

        Ok(Self {
            id: UserId::new(),
            username,
            email,
            password_hash: password_hash.into(),
            roles: unique,
        })
    }

    pub fn into_record(self) -> UserRecord {
        UserRecord {
            id: self.id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            roles: self.roles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_are_deduplicated_in_order() {
        let user = NewUser::new(
            "alice",
            "a@x.com",
            "$argon2id$stub",
            vec![Role::Creator, Role::Reader, Role::Creator],
        )
        .unwrap();
        assert_eq!(user.roles, vec![Role::Creator, Role::Reader]);
    }

    #[test]
    fn empty_roles_are_rejected() {
        let err = NewUser::new("alice", "a@x.com", "$argon2id$stub", vec![]).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn blank_email_is_rejected() {
        assert!(NewUser::new("alice", "  ", "$argon2id$stub", vec![Role::Reader]).is_err());
    }

    #[test]
    fn record_principal_mirrors_roles() {
        let record = NewUser::new("bob", "b@x.com", "$argon2id$stub", vec![Role::Admin])
            .unwrap()
            .into_record();
        let principal = record.principal();
        assert_eq!(principal.id, record.id);
        assert_eq!(principal.roles, vec![Role::Admin]);
    }
}
