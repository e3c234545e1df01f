//! Verified caller identity
//!
//! Supplied by the identity provider after token verification. The ledger
//! trusts it as-is and only checks capabilities.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::errors::{AuthError, ValidationError};
use crate::ids::UserId;

/// Named role carried in the caller's claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    MarketManager,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::MarketManager => "marketManager",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "marketManager" => Ok(Role::MarketManager),
            "admin" => Ok(Role::Admin),
            _ => Err(ValidationError::InvalidRole(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: UserId,
    pub roles: BTreeSet<Role>,
}

impl Caller {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            roles: BTreeSet::new(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role);
        self
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Admins implicitly hold every role.
    pub fn require_role(&self, role: Role) -> Result<(), AuthError> {
        if self.has_role(role) || self.has_role(Role::Admin) {
            Ok(())
        } else {
            Err(AuthError::MissingRole {
                user_id: self.user_id.to_string(),
                role: role.as_str().to_string(),
            })
        }
    }
}
