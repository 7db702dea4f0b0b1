use serde::{Deserialize, Serialize};

use rolegate_core::UserId;

use crate::Role;

/// An authenticated identity together with the roles it holds.
///
/// Built either from a freshly verified login (to mint a token) or from a
/// verified session token (one per request).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: UserId,
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn new(id: UserId, roles: Vec<Role>) -> Self {
        Self { id, roles }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}
