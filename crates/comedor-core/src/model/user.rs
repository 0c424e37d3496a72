use chrono::{DateTime, Utc};
use comedor_core_types::Role;
use serde::{Deserialize, Serialize};

/// User - platform account
///
/// A user registers itself, authors comments (User/Admin roles), owns
/// restaurants and answers comments (Owner/Admin roles). The password field
/// is an opaque credential produced by the excluded authentication layer;
/// the core stores and returns it but never interprets it, and the
/// visibility views never expose it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier (UUID v7)
    pub id: String,

    /// Display name
    pub name: String,

    /// Email address, unique across all stored users (deleted included)
    pub email: String,

    /// Opaque credential, hashed by the excluded layer
    pub password: String,

    /// Role in the capability lattice
    pub role: Role,

    /// Optional image reference (opaque filename, managed externally)
    pub image: Option<String>,

    /// Tombstone flag - false means logically absent but physically retained
    pub status: bool,

    /// Timestamp when this user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when this user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new visible user with the given identity and role
    pub fn new(id: String, name: String, email: String, password: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            email,
            password,
            role,
            image: None,
            status: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if this user is visible (not soft-deleted)
    pub fn is_visible(&self) -> bool {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user() {
        let user = User::new(
            "user-1".to_string(),
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "opaque-hash".to_string(),
            Role::User,
        );

        assert_eq!(user.id, "user-1");
        assert_eq!(user.role, Role::User);
        assert!(user.is_visible());
        assert!(user.image.is_none());
    }
}
