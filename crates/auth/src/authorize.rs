use thiserror::Error;

use crate::{Principal, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: requires one of {required:?}")]
    Forbidden { required: Vec<Role> },
}

/// Authorize a principal against a route's required role set.
///
/// Allowed iff the principal holds at least one of `required`.
/// An empty `required` set allows nobody.
///
/// - No IO
/// - No panics
pub fn authorize(principal: &Principal, required: &[Role]) -> Result<(), AuthzError> {
    if required.iter().any(|role| principal.has_role(*role)) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden {
            required: required.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rolegate_core::UserId;

    fn principal(roles: Vec<Role>) -> Principal {
        Principal::new(UserId::new(), roles)
    }

    fn role_strategy() -> impl Strategy<Value = Role> {
        prop_oneof![Just(Role::Reader), Just(Role::Creator), Just(Role::Admin)]
    }

    #[test]
    fn any_single_matching_role_is_enough() {
        let p = principal(vec![Role::Creator]);
        assert!(authorize(&p, &[Role::Reader, Role::Creator, Role::Admin]).is_ok());
    }

    #[test]
    fn disjoint_roles_are_forbidden() {
        let p = principal(vec![Role::Reader]);
        let err = authorize(&p, &[Role::Admin]).unwrap_err();
        assert_eq!(err, AuthzError::Forbidden { required: vec![Role::Admin] });
    }

    #[test]
    fn empty_role_set_is_forbidden_everywhere() {
        let p = principal(vec![]);
        assert!(authorize(&p, &Role::ALL).is_err());
    }

    proptest! {
        #[test]
        fn allowed_iff_intersection_non_empty(
            held in proptest::collection::vec(role_strategy(), 0..4),
            required in proptest::collection::vec(role_strategy(), 0..4),
        ) {
            let intersects = held.iter().any(|r| required.contains(r));
            let p = principal(held);
            prop_assert_eq!(authorize(&p, &required).is_ok(), intersects);
        }
    }
}
