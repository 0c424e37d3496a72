use std::collections::HashMap;

use crate::errors::{CoreError, Result};
use crate::model::{Comment, Restaurant, Review, User};

/// In-memory entity store for the four collections
///
/// HashMap-based storage keyed by opaque identifiers. Not thread-safe on its
/// own (no Arc/RwLock) - the engine facade wraps it for concurrent use. The
/// core never issues query shapes beyond the surface exposed here.
///
/// Two access tiers:
/// - visible getters (`get_user` etc.) treat tombstoned entities as absent
///   and return a NotFound-class error, so no caller can read a soft-deleted
///   entity by accident;
/// - raw getters (`get_user_raw` etc.) are tombstone-blind and exist for
///   restore operations, relation expansion and invariant sweeps.
#[derive(Debug, Clone, Default)]
pub struct Store {
    /// Map of user ID to User
    pub(crate) users: HashMap<String, User>,
    /// Map of restaurant ID to Restaurant
    pub(crate) restaurants: HashMap<String, Restaurant>,
    /// Map of comment ID to Comment
    pub(crate) comments: HashMap<String, Comment>,
    /// Map of review ID to Review
    pub(crate) reviews: HashMap<String, Review>,
}

impl Store {
    /// Create a new empty Store
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Users =====

    /// Get a visible user by ID
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if the user doesn't exist or is tombstoned.
    pub fn get_user(&self, id: &str) -> Result<&User> {
        self.users
            .get(id)
            .filter(|u| u.status)
            .ok_or_else(|| CoreError::UserNotFound {
                user_id: id.to_string(),
            })
    }

    /// Get a mutable reference to a visible user by ID
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if the user doesn't exist or is tombstoned.
    pub fn get_user_mut(&mut self, id: &str) -> Result<&mut User> {
        self.users
            .get_mut(id)
            .filter(|u| u.status)
            .ok_or_else(|| CoreError::UserNotFound {
                user_id: id.to_string(),
            })
    }

    /// Get a user by ID, bypassing the tombstone check
    pub fn get_user_raw(&self, id: &str) -> Option<&User> {
        self.users.get(id)
    }

    /// Get a mutable user by ID, bypassing the tombstone check
    pub fn get_user_raw_mut(&mut self, id: &str) -> Option<&mut User> {
        self.users.get_mut(id)
    }

    /// List all visible users
    pub fn list_users(&self) -> Vec<&User> {
        let mut users: Vec<&User> = self.users.values().filter(|u| u.status).collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        users
    }

    /// Count visible users
    pub fn count_users(&self) -> usize {
        self.users.values().filter(|u| u.status).count()
    }

    /// Find a user by email, deleted accounts included
    ///
    /// Email uniqueness holds across the whole collection: a deleted account
    /// keeps its address, so re-registration with it is rejected.
    pub fn find_user_by_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|u| u.email == email)
    }

    /// Insert a user into the store
    pub fn insert_user(&mut self, user: User) {
        self.users.insert(user.id.clone(), user);
    }

    // ===== Restaurants =====

    /// Get a visible restaurant by ID
    ///
    /// # Errors
    ///
    /// Returns `RestaurantNotFound` if the restaurant doesn't exist or is
    /// tombstoned.
    pub fn get_restaurant(&self, id: &str) -> Result<&Restaurant> {
        self.restaurants
            .get(id)
            .filter(|r| r.status)
            .ok_or_else(|| CoreError::RestaurantNotFound {
                restaurant_id: id.to_string(),
            })
    }

    /// Get a mutable reference to a visible restaurant by ID
    ///
    /// # Errors
    ///
    /// Returns `RestaurantNotFound` if the restaurant doesn't exist or is
    /// tombstoned.
    pub fn get_restaurant_mut(&mut self, id: &str) -> Result<&mut Restaurant> {
        self.restaurants
            .get_mut(id)
            .filter(|r| r.status)
            .ok_or_else(|| CoreError::RestaurantNotFound {
                restaurant_id: id.to_string(),
            })
    }

    /// Get a restaurant by ID, bypassing the tombstone check
    pub fn get_restaurant_raw(&self, id: &str) -> Option<&Restaurant> {
        self.restaurants.get(id)
    }

    /// Get a mutable restaurant by ID, bypassing the tombstone check
    pub fn get_restaurant_raw_mut(&mut self, id: &str) -> Option<&mut Restaurant> {
        self.restaurants.get_mut(id)
    }

    /// List all visible restaurants in creation order
    pub fn list_restaurants(&self) -> Vec<&Restaurant> {
        let mut restaurants: Vec<&Restaurant> =
            self.restaurants.values().filter(|r| r.status).collect();
        restaurants.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        restaurants
    }

    /// Find the restaurant referencing a comment, tombstoned included
    ///
    /// Rating recomputation must keep derived state consistent even while
    /// the owning restaurant is invisible, hence the raw scan.
    pub fn find_restaurant_by_comment(&self, comment_id: &str) -> Option<&Restaurant> {
        self.restaurants
            .values()
            .find(|r| r.comment_ids.iter().any(|id| id == comment_id))
    }

    /// Insert a restaurant into the store
    pub fn insert_restaurant(&mut self, restaurant: Restaurant) {
        self.restaurants.insert(restaurant.id.clone(), restaurant);
    }

    // ===== Comments =====

    /// Get a visible comment by ID
    ///
    /// # Errors
    ///
    /// Returns `CommentNotFound` if the comment doesn't exist or is
    /// tombstoned.
    pub fn get_comment(&self, id: &str) -> Result<&Comment> {
        self.comments
            .get(id)
            .filter(|c| c.status)
            .ok_or_else(|| CoreError::CommentNotFound {
                comment_id: id.to_string(),
            })
    }

    /// Get a mutable reference to a visible comment by ID
    ///
    /// # Errors
    ///
    /// Returns `CommentNotFound` if the comment doesn't exist or is
    /// tombstoned.
    pub fn get_comment_mut(&mut self, id: &str) -> Result<&mut Comment> {
        self.comments
            .get_mut(id)
            .filter(|c| c.status)
            .ok_or_else(|| CoreError::CommentNotFound {
                comment_id: id.to_string(),
            })
    }

    /// Get a comment by ID, bypassing the tombstone check
    pub fn get_comment_raw(&self, id: &str) -> Option<&Comment> {
        self.comments.get(id)
    }

    /// Get a mutable comment by ID, bypassing the tombstone check
    pub fn get_comment_raw_mut(&mut self, id: &str) -> Option<&mut Comment> {
        self.comments.get_mut(id)
    }

    /// List all visible comments in creation order
    pub fn list_comments(&self) -> Vec<&Comment> {
        let mut comments: Vec<&Comment> = self.comments.values().filter(|c| c.status).collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        comments
    }

    /// Find the visible comment holding a reference to the given review
    pub fn find_comment_by_review(&self, review_id: &str) -> Option<&Comment> {
        self.comments
            .values()
            .filter(|c| c.status)
            .find(|c| c.review.as_deref() == Some(review_id))
    }

    /// Insert a comment into the store
    pub fn insert_comment(&mut self, comment: Comment) {
        self.comments.insert(comment.id.clone(), comment);
    }

    // ===== Reviews =====

    /// Get a visible review by ID
    ///
    /// # Errors
    ///
    /// Returns `ReviewNotFound` if the review doesn't exist or is tombstoned.
    pub fn get_review(&self, id: &str) -> Result<&Review> {
        self.reviews
            .get(id)
            .filter(|r| r.status)
            .ok_or_else(|| CoreError::ReviewNotFound {
                review_id: id.to_string(),
            })
    }

    /// Get a mutable reference to a visible review by ID
    ///
    /// # Errors
    ///
    /// Returns `ReviewNotFound` if the review doesn't exist or is tombstoned.
    pub fn get_review_mut(&mut self, id: &str) -> Result<&mut Review> {
        self.reviews
            .get_mut(id)
            .filter(|r| r.status)
            .ok_or_else(|| CoreError::ReviewNotFound {
                review_id: id.to_string(),
            })
    }

    /// Get a review by ID, bypassing the tombstone check
    pub fn get_review_raw(&self, id: &str) -> Option<&Review> {
        self.reviews.get(id)
    }

    /// Get a mutable review by ID, bypassing the tombstone check
    pub fn get_review_raw_mut(&mut self, id: &str) -> Option<&mut Review> {
        self.reviews.get_mut(id)
    }

    /// List all visible reviews in creation order
    pub fn list_reviews(&self) -> Vec<&Review> {
        let mut reviews: Vec<&Review> = self.reviews.values().filter(|r| r.status).collect();
        reviews.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        reviews
    }

    /// Insert a review into the store
    pub fn insert_review(&mut self, review: Review) {
        self.reviews.insert(review.id.clone(), review);
    }
}
