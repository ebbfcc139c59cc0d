//! Documents of the `users` collection.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::UserId;

/// Role recorded on a user document.
///
/// Roles are opaque strings in storage; only `owner` and `renter` carry
/// meaning. A user without a role field is simply unset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub const OWNER: &'static str = "owner";
    pub const RENTER: &'static str = "renter";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn owner() -> Self {
        Self::new(Self::OWNER)
    }

    pub fn renter() -> Self {
        Self::new(Self::RENTER)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_owner(&self) -> bool {
        self.0 == Self::OWNER
    }

    pub fn is_renter(&self) -> bool {
        self.0 == Self::RENTER
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user as submitted on signup.
///
/// `email` is the identity key. Everything else the client sends (name,
/// photo, ...) is kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn new(email: impl Into<String>, role: Option<Role>) -> Self {
        Self {
            email: email.into(),
            role,
            extra: Map::new(),
        }
    }

    /// Drop a client-supplied `_id`; identifiers are assigned by the store.
    pub fn without_client_id(mut self) -> Self {
        self.extra.remove("_id");
        self
    }
}

/// A stored user: the submitted document plus its identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: UserId,

    #[serde(flatten)]
    pub user: User,
}

impl UserDocument {
    pub fn new(id: UserId, user: User) -> Self {
        Self {
            id,
            user: user.without_client_id(),
        }
    }
}
