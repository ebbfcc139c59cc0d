//! Resource access policy for owner-scoped routes.
//!
//! - No IO
//! - No panics
//! - Pure decision over the identity and the requested resource

use serde::Serialize;
use thiserror::Error;

use househunter_core::UserDocument;

use crate::Identity;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: identity does not match the requested user")]
    Forbidden,
}

/// Allow only when the caller asks about themselves.
///
/// An identity without an `email` claim never matches.
pub fn require_self(identity: &Identity, target_email: &str) -> Result<(), AuthzError> {
    match identity.email() {
        Some(email) if email == target_email => Ok(()),
        _ => Err(AuthzError::Forbidden),
    }
}

/// Role answer for a user lookup. Both flags are false for unknown users.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoleFlags {
    pub owner: bool,
    #[serde(rename = "isRenter")]
    pub is_renter: bool,
}

impl RoleFlags {
    pub fn from_user(user: Option<&UserDocument>) -> Self {
        match user.and_then(|u| u.user.role.as_ref()) {
            Some(role) => Self {
                owner: role.is_owner(),
                is_renter: role.is_renter(),
            },
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use househunter_core::{Role, User, UserId};
    use serde_json::{Map, Value, json};

    fn identity(payload: Value) -> Identity {
        match payload {
            Value::Object(map) => Identity::new(map),
            _ => Identity::new(Map::new()),
        }
    }

    #[test]
    fn self_access_is_allowed() {
        let id = identity(json!({ "email": "a@example.com" }));
        assert_eq!(require_self(&id, "a@example.com"), Ok(()));
    }

    #[test]
    fn other_users_are_forbidden() {
        let id = identity(json!({ "email": "a@example.com" }));
        assert_eq!(require_self(&id, "b@example.com"), Err(AuthzError::Forbidden));
        // Exact comparison, no case folding.
        assert_eq!(require_self(&id, "A@example.com"), Err(AuthzError::Forbidden));
    }

    #[test]
    fn missing_or_non_string_email_never_matches() {
        assert_eq!(
            require_self(&identity(json!({ "name": "x" })), ""),
            Err(AuthzError::Forbidden)
        );
        assert_eq!(
            require_self(&identity(json!({ "email": 7 })), "7"),
            Err(AuthzError::Forbidden)
        );
    }

    #[test]
    fn role_flags_follow_role() {
        let doc = |role: Option<Role>| UserDocument::new(UserId::new(), User::new("a@example.com", role));

        assert_eq!(
            RoleFlags::from_user(Some(&doc(Some(Role::owner())))),
            RoleFlags { owner: true, is_renter: false }
        );
        assert_eq!(
            RoleFlags::from_user(Some(&doc(Some(Role::renter())))),
            RoleFlags { owner: false, is_renter: true }
        );
        assert_eq!(RoleFlags::from_user(Some(&doc(None))), RoleFlags::default());
        assert_eq!(RoleFlags::from_user(None), RoleFlags::default());
    }

    #[test]
    fn role_flags_wire_shape() {
        assert_eq!(
            serde_json::to_value(RoleFlags { owner: true, is_renter: false }).unwrap(),
            json!({ "owner": true, "isRenter": false })
        );
    }
}
