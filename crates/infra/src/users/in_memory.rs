use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use rolegate_auth::{NewUser, UserRecord};

use super::{UserStore, UserStoreError};

/// In-memory user store keyed by email.
///
/// Intended for tests/dev. Uniqueness is checked and the insert performed
/// under one write lock.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    by_email: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_email
            .read()
            .map(|m| m.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserStoreError> {
        let map = self
            .by_email
            .read()
            .map_err(|_| UserStoreError::Unavailable("user map lock poisoned".to_string()))?;
        Ok(map.get(email).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord, UserStoreError> {
        let mut map = self
            .by_email
            .write()
            .map_err(|_| UserStoreError::Unavailable("user map lock poisoned".to_string()))?;

        if map.contains_key(&user.email) {
            return Err(UserStoreError::DuplicateKey { email: user.email });
        }

        let record = user.into_record();
        map.insert(record.email.clone(), record.clone());
        Ok(record)
    }
}
