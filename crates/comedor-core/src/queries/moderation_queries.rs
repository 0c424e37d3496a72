use crate::errors::{CoreError, Result};
use crate::ops::Store;
use crate::visibility::{
    expand_comment, expand_review, prune_comment, prune_review, CommentView, ReviewView, UserView,
};

/// List visible comments with their relations resolved (moderation surface)
pub fn list_comments(store: &Store, from: usize) -> Vec<CommentView> {
    store
        .list_comments()
        .into_iter()
        .skip(from)
        .filter_map(|c| prune_comment(expand_comment(store, c)))
        .collect()
}

/// Get one visible comment with its relations resolved
///
/// # Errors
///
/// Returns `CommentNotFound` if the comment doesn't exist or is tombstoned.
pub fn get_comment(store: &Store, id: &str) -> Result<CommentView> {
    let comment = store.get_comment(id)?;
    prune_comment(expand_comment(store, comment)).ok_or_else(|| CoreError::CommentNotFound {
        comment_id: id.to_string(),
    })
}

/// List visible reviews with their owners resolved
pub fn list_reviews(store: &Store, from: usize) -> Vec<ReviewView> {
    store
        .list_reviews()
        .into_iter()
        .skip(from)
        .filter_map(|r| prune_review(expand_review(store, r)))
        .collect()
}

/// List visible users plus the total visible count
///
/// The count is taken over the whole visible set, not the returned page, so
/// callers can paginate.
pub fn list_users(store: &Store, from: usize) -> (Vec<UserView>, usize) {
    let quantity = store.count_users();
    let users = store
        .list_users()
        .into_iter()
        .skip(from)
        .map(UserView::from_entity)
        .collect();
    (users, quantity)
}

/// Get one visible user
///
/// # Errors
///
/// Returns `UserNotFound` if the user doesn't exist or is tombstoned.
pub fn get_user(store: &Store, id: &str) -> Result<UserView> {
    Ok(UserView::from_entity(store.get_user(id)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{comment_ops, restaurant_ops, review_ops, user_ops};
    use comedor_core_types::Role;

    struct Fixture {
        user_id: String,
        comment_id: String,
        review_id: String,
    }

    fn setup(store: &mut Store) -> Fixture {
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
        let comment_id = comment_ops::create_comment(
            store,
            &restaurant_id,
            &user_id,
            4,
            "Good".to_string(),
            String::new(),
        )
        .unwrap();
        let review_id =
            review_ops::submit_review(store, &comment_id, &owner_id, "Thanks!".to_string())
                .unwrap();
        Fixture {
            user_id,
            comment_id,
            review_id,
        }
    }

    #[test]
    fn test_list_comments_resolves_review() {
        let mut store = Store::new();
        let fx = setup(&mut store);

        let comments = list_comments(&store, 0);
        assert_eq!(comments.len(), 1);
        let review = comments[0].review.as_ref().unwrap();
        assert_eq!(review.id, fx.review_id);
    }

    #[test]
    fn test_get_comment_hides_tombstoned_author() {
        let mut store = Store::new();
        let fx = setup(&mut store);
        user_ops::delete_user(&mut store, &fx.user_id).unwrap();

        let view = get_comment(&store, &fx.comment_id).unwrap();
        assert!(view.user.is_none());
    }

    #[test]
    fn test_list_reviews_skips_retracted() {
        let mut store = Store::new();
        let fx = setup(&mut store);
        assert_eq!(list_reviews(&store, 0).len(), 1);

        review_ops::retract_review(&mut store, &fx.review_id).unwrap();
        assert!(list_reviews(&store, 0).is_empty());
    }

    #[test]
    fn test_list_users_quantity_covers_full_set() {
        let mut store = Store::new();
        setup(&mut store);

        let (page, quantity) = list_users(&store, 1);
        assert_eq!(quantity, 2);
        assert_eq!(page.len(), 1);
    }

    #[test]
    fn test_get_user_never_exposes_credential() {
        let mut store = Store::new();
        let fx = setup(&mut store);

        let view = get_user(&store, &fx.user_id).unwrap();
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("hash"));
    }

    #[test]
    fn test_get_user_not_found_when_tombstoned() {
        let mut store = Store::new();
        let fx = setup(&mut store);
        user_ops::delete_user(&mut store, &fx.user_id).unwrap();

        assert!(matches!(
            get_user(&store, &fx.user_id),
            Err(CoreError::UserNotFound { .. })
        ));
    }
}
