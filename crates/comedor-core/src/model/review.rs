use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review - a restaurant owner's answer to a comment
///
/// At most one review per comment; created only against a comment in the
/// `Open` state by a user holding the Owner or Admin role. The comment side
/// holds the reference; tombstoning the review reopens its comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Unique identifier (UUID v7)
    pub id: String,

    /// Free-form answer body
    pub description: String,

    /// Answering user id (role Owner or Admin at creation time)
    pub owner: String,

    /// Tombstone flag
    pub status: bool,

    /// Timestamp when this review was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when this review was last updated
    pub updated_at: DateTime<Utc>,
}

impl Review {
    /// Create a new visible review
    pub fn new(id: String, description: String, owner: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            description,
            owner,
            status: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if this review is visible (not soft-deleted)
    pub fn is_visible(&self) -> bool {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_review() {
        let review = Review::new(
            "rev-1".to_string(),
            "Thanks for visiting".to_string(),
            "owner-1".to_string(),
        );

        assert!(review.is_visible());
        assert_eq!(review.owner, "owner-1");
    }
}
