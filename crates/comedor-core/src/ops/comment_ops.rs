use chrono::Utc;
use comedor_core_types::Role;
use uuid::Uuid;

use super::store::Store;
use crate::errors::{CoreError, Result};
use crate::model::Comment;
use crate::rating;
use crate::rules::validation::{require_non_blank, validate_rate};

/// Create a new comment on a restaurant
///
/// One visible comment per (restaurant, user) pair: a second attempt fails
/// with `DuplicateComment` while the first remains visible. Tombstoned
/// comments never block a new one. The comment reference is appended to the
/// restaurant and the rating recomputed in the same logical operation.
///
/// # Arguments
/// * `store` - Mutable reference to the Store
/// * `restaurant_id` - The restaurant being commented on
/// * `user_id` - The authoring user (must not hold the Owner role)
/// * `rate` - Rating, 0-5
/// * `title` - Short title (must not be blank)
/// * `description` - Body text
///
/// # Returns
/// The ID of the newly created comment
///
/// # Errors
/// * `InvalidRate` / `InvalidField` - On field validation failure
/// * `UserNotFound` - If the author doesn't exist or is tombstoned
/// * `Forbidden` - If the author holds the Owner role
/// * `RestaurantNotFound` - If the restaurant doesn't exist or is tombstoned
/// * `DuplicateComment` - If a visible comment by this user already exists
pub fn create_comment(
    store: &mut Store,
    restaurant_id: &str,
    user_id: &str,
    rate: u8,
    title: String,
    description: String,
) -> Result<String> {
    validate_rate(rate)?;
    require_non_blank("title", &title)?;

    let author = store.get_user(user_id)?;
    if author.role == Role::Owner {
        return Err(CoreError::Forbidden {
            reason: "Owner cannot create comments".to_string(),
        });
    }

    let restaurant = store.get_restaurant(restaurant_id)?;

    // Only visible comments block a duplicate; a tombstoned one does not
    let duplicate = restaurant
        .comment_ids
        .iter()
        .filter_map(|id| store.get_comment_raw(id))
        .filter(|c| c.status)
        .any(|c| c.user == user_id);
    if duplicate {
        return Err(CoreError::DuplicateComment {
            restaurant_id: restaurant_id.to_string(),
            user_id: user_id.to_string(),
        });
    }

    let comment_id = Uuid::now_v7().to_string();
    store.insert_comment(Comment::new(
        comment_id.clone(),
        rate,
        title,
        description,
        user_id.to_string(),
    ));

    let restaurant = store.get_restaurant_mut(restaurant_id)?;
    restaurant.add_comment_id(comment_id.clone());
    restaurant.updated_at = Utc::now();

    rating::recompute(store, restaurant_id)?;

    Ok(comment_id)
}

/// Update a comment's content fields (admin moderation)
///
/// `opened` and `review` are owned by the moderation workflow and `status`
/// by the delete/restore ops; neither is writable here. A rate change
/// recomputes the owning restaurant's rating.
///
/// # Errors
/// * `CommentNotFound` - If the comment doesn't exist or is tombstoned
/// * `InvalidRate` / `InvalidField` - On field validation failure
pub fn update_comment(
    store: &mut Store,
    id: &str,
    rate: Option<u8>,
    title: Option<String>,
    description: Option<String>,
) -> Result<()> {
    if let Some(r) = rate {
        validate_rate(r)?;
    }
    if let Some(ref t) = title {
        require_non_blank("title", t)?;
    }

    let comment = store.get_comment_mut(id)?;

    let mut rate_changed = false;
    if let Some(new_rate) = rate {
        rate_changed = new_rate != comment.rate;
        comment.rate = new_rate;
    }
    if let Some(new_title) = title {
        comment.title = new_title;
    }
    if let Some(new_description) = description {
        comment.description = new_description;
    }
    comment.updated_at = Utc::now();

    if rate_changed {
        if let Some(restaurant) = store.find_restaurant_by_comment(id) {
            let restaurant_id = restaurant.id.clone();
            rating::recompute(store, &restaurant_id)?;
        }
    }

    Ok(())
}

/// Soft-delete a comment (tombstone)
///
/// Leaves the comment's `opened`/`review` state untouched - deleting a
/// comment does not retract its review. The owning restaurant's rating is
/// recomputed over the shrunken visible set.
///
/// # Errors
/// * `CommentNotFound` - If the comment doesn't exist or was already deleted
pub fn delete_comment(store: &mut Store, id: &str) -> Result<()> {
    let comment = store.get_comment_mut(id)?;
    comment.status = false;
    comment.updated_at = Utc::now();

    if let Some(restaurant) = store.find_restaurant_by_comment(id) {
        let restaurant_id = restaurant.id.clone();
        rating::recompute(store, &restaurant_id)?;
    }

    Ok(())
}

/// Restore a previously soft-deleted comment
///
/// Recomputes the owning restaurant's rating over the grown visible set.
/// Restoring an already-visible comment is a no-op.
///
/// # Errors
/// * `CommentNotFound` - If no comment is stored under the id
pub fn restore_comment(store: &mut Store, id: &str) -> Result<()> {
    let comment = store
        .get_comment_raw_mut(id)
        .ok_or_else(|| CoreError::CommentNotFound {
            comment_id: id.to_string(),
        })?;
    if !comment.status {
        comment.status = true;
        comment.updated_at = Utc::now();

        if let Some(restaurant) = store.find_restaurant_by_comment(id) {
            let restaurant_id = restaurant.id.clone();
            rating::recompute(store, &restaurant_id)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{restaurant_ops, user_ops};

    fn setup(store: &mut Store) -> (String, String) {
        let owner_id = user_ops::register_user(
            store,
            "Owner".to_string(),
            "o@example.com".to_string(),
            "hash".to_string(),
            Role::Owner,
        )
        .unwrap();
        let user_id = user_ops::register_user(
            store,
            "Diner".to_string(),
            "d@example.com".to_string(),
            "hash".to_string(),
            Role::User,
        )
        .unwrap();
        let restaurant_id = restaurant_ops::create_restaurant(
            store,
            "La Mesa".to_string(),
            "Tapas".to_string(),
            &owner_id,
        )
        .unwrap();
        (restaurant_id, user_id)
    }

    #[test]
    fn test_create_comment_appends_reference_and_recomputes() {
        let mut store = Store::new();
        let (restaurant_id, user_id) = setup(&mut store);

        let comment_id = create_comment(
            &mut store,
            &restaurant_id,
            &user_id,
            4,
            "Good".to_string(),
            "Solid tapas".to_string(),
        )
        .unwrap();

        let restaurant = store.get_restaurant(&restaurant_id).unwrap();
        assert_eq!(restaurant.comment_ids, vec![comment_id.clone()]);
        assert_eq!(restaurant.normal_rate, 4);

        let comment = store.get_comment(&comment_id).unwrap();
        assert!(comment.opened);
        assert!(comment.review.is_none());
    }

    #[test]
    fn test_create_comment_duplicate_blocked_while_visible() {
        let mut store = Store::new();
        let (restaurant_id, user_id) = setup(&mut store);

        create_comment(
            &mut store,
            &restaurant_id,
            &user_id,
            4,
            "Good".to_string(),
            String::new(),
        )
        .unwrap();

        let result = create_comment(
            &mut store,
            &restaurant_id,
            &user_id,
            2,
            "Changed my mind".to_string(),
            String::new(),
        );
        assert!(matches!(result, Err(CoreError::DuplicateComment { .. })));
    }

    #[test]
    fn test_create_comment_allowed_after_soft_delete() {
        let mut store = Store::new();
        let (restaurant_id, user_id) = setup(&mut store);

        let first = create_comment(
            &mut store,
            &restaurant_id,
            &user_id,
            4,
            "Good".to_string(),
            String::new(),
        )
        .unwrap();
        delete_comment(&mut store, &first).unwrap();

        // The tombstoned comment no longer blocks
        let second = create_comment(
            &mut store,
            &restaurant_id,
            &user_id,
            2,
            "Changed my mind".to_string(),
            String::new(),
        );
        assert!(second.is_ok());
    }

    #[test]
    fn test_create_comment_owner_forbidden() {
        let mut store = Store::new();
        let (restaurant_id, _) = setup(&mut store);
        let owner_id = store
            .list_users()
            .iter()
            .find(|u| u.role == Role::Owner)
            .unwrap()
            .id
            .clone();

        let result = create_comment(
            &mut store,
            &restaurant_id,
            &owner_id,
            5,
            "Self praise".to_string(),
            String::new(),
        );
        assert!(matches!(result, Err(CoreError::Forbidden { .. })));
    }

    #[test]
    fn test_create_comment_invalid_rate() {
        let mut store = Store::new();
        let (restaurant_id, user_id) = setup(&mut store);

        let result = create_comment(
            &mut store,
            &restaurant_id,
            &user_id,
            6,
            "Too good".to_string(),
            String::new(),
        );
        assert!(matches!(result, Err(CoreError::InvalidRate { rate: 6 })));
    }

    #[test]
    fn test_delete_comment_recomputes_but_keeps_workflow_state() {
        let mut store = Store::new();
        let (restaurant_id, user_id) = setup(&mut store);
        let comment_id = create_comment(
            &mut store,
            &restaurant_id,
            &user_id,
            4,
            "Good".to_string(),
            String::new(),
        )
        .unwrap();

        delete_comment(&mut store, &comment_id).unwrap();

        assert_eq!(store.get_restaurant(&restaurant_id).unwrap().normal_rate, 0);
        let raw = store.get_comment_raw(&comment_id).unwrap();
        assert!(raw.opened);
        assert!(raw.review.is_none());
    }

    #[test]
    fn test_update_comment_rate_recomputes() {
        let mut store = Store::new();
        let (restaurant_id, user_id) = setup(&mut store);
        let comment_id = create_comment(
            &mut store,
            &restaurant_id,
            &user_id,
            4,
            "Good".to_string(),
            String::new(),
        )
        .unwrap();

        update_comment(&mut store, &comment_id, Some(2), None, None).unwrap();
        assert_eq!(store.get_restaurant(&restaurant_id).unwrap().normal_rate, 2);
    }

    #[test]
    fn test_restore_comment_recomputes() {
        let mut store = Store::new();
        let (restaurant_id, user_id) = setup(&mut store);
        let comment_id = create_comment(
            &mut store,
            &restaurant_id,
            &user_id,
            5,
            "Great".to_string(),
            String::new(),
        )
        .unwrap();

        delete_comment(&mut store, &comment_id).unwrap();
        assert_eq!(store.get_restaurant(&restaurant_id).unwrap().normal_rate, 0);

        restore_comment(&mut store, &comment_id).unwrap();
        assert_eq!(store.get_restaurant(&restaurant_id).unwrap().normal_rate, 5);
    }
}
