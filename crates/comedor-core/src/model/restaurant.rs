use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Restaurant - the reviewed establishment
///
/// A restaurant is owned by a user holding the Owner or Admin role and keeps
/// an ordered list of comment references. Comment lifetime is independent of
/// the restaurant: the list holds references, not ownership, and tombstoned
/// comments stay in the list (visibility is applied at read time).
///
/// `normal_rate` is derived state: the floor of the mean rate over the
/// currently visible referenced comments (0 if none). Only the rating
/// aggregator writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    /// Unique identifier (UUID v7)
    pub id: String,

    /// Restaurant name
    pub name: String,

    /// Free-form description
    pub description: String,

    /// Owning user id (role Owner or Admin at creation time)
    pub owner: String,

    /// Ordered comment references (reference semantics, append-only order)
    pub comment_ids: Vec<String>,

    /// Derived summary rating, 0-5
    pub normal_rate: u8,

    /// Optional image reference (opaque filename, managed externally)
    pub image: Option<String>,

    /// Tombstone flag
    pub status: bool,

    /// Timestamp when this restaurant was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when this restaurant was last updated
    pub updated_at: DateTime<Utc>,
}

impl Restaurant {
    /// Create a new visible restaurant with no comments and rating 0
    pub fn new(id: String, name: String, description: String, owner: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            description,
            owner,
            comment_ids: Vec::new(),
            normal_rate: 0,
            image: None,
            status: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if this restaurant is visible (not soft-deleted)
    pub fn is_visible(&self) -> bool {
        self.status
    }

    /// Append a comment reference, ignoring duplicates
    pub fn add_comment_id(&mut self, comment_id: String) {
        if !self.comment_ids.contains(&comment_id) {
            self.comment_ids.push(comment_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_restaurant() {
        let restaurant = Restaurant::new(
            "rest-1".to_string(),
            "La Mesa".to_string(),
            "Tapas".to_string(),
            "owner-1".to_string(),
        );

        assert_eq!(restaurant.normal_rate, 0);
        assert!(restaurant.comment_ids.is_empty());
        assert!(restaurant.is_visible());
    }

    #[test]
    fn test_add_comment_id_deduplicates() {
        let mut restaurant = Restaurant::new(
            "rest-1".to_string(),
            "La Mesa".to_string(),
            "Tapas".to_string(),
            "owner-1".to_string(),
        );

        restaurant.add_comment_id("c-1".to_string());
        restaurant.add_comment_id("c-2".to_string());
        restaurant.add_comment_id("c-1".to_string());

        assert_eq!(restaurant.comment_ids, vec!["c-1", "c-2"]);
    }
}
