use rolegate_auth::{Principal, Role};
use rolegate_core::UserId;

/// Principal context for a request (authenticated identity + roles).
///
/// Inserted into request extensions by the authenticate stage; downstream
/// stages and handlers extract it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal_id(&self) -> UserId {
        self.principal.id
    }

    pub fn roles(&self) -> &[Role] {
        &self.principal.roles
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }
}
