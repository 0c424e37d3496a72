//! Caller identity and the closed role lattice
//!
//! Roles form a flat capability lattice, not an inheritance chain: Admin
//! holds every moderation capability, Owner holds the manage-class
//! capabilities on resources it owns, User holds the commenting and public
//! read capabilities. The wire names (`USER_ROLE` etc.) are the persisted
//! representation and must not change.

use serde::{Deserialize, Serialize};

/// Closed role enumeration
///
/// Replaces free-form role strings with a typed lattice so a typo can never
/// grant or withhold a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "USER_ROLE")]
    User,
    #[serde(rename = "OWNER_ROLE")]
    Owner,
    #[serde(rename = "ADMIN_ROLE")]
    Admin,
}

impl Role {
    /// Stable wire name for this role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER_ROLE",
            Role::Owner => "OWNER_ROLE",
            Role::Admin => "ADMIN_ROLE",
        }
    }

    /// Parse a wire name back into a role
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "USER_ROLE" => Some(Role::User),
            "OWNER_ROLE" => Some(Role::Owner),
            "ADMIN_ROLE" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Admin capability: full moderation access
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Manage capability: may own restaurants and answer comments
    pub fn can_manage(self) -> bool {
        matches!(self, Role::Owner | Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Already-authenticated caller identity, as handed over by the excluded
/// HTTP layer after token verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub user_id: String,
    pub role: Role,
}

impl Caller {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    /// Check whether this caller is the user identified by `user_id`
    pub fn is_self(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}
