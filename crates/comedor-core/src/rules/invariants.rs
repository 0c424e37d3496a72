//! Whole-store invariant sweep
//!
//! A diagnostic pass over every stored entity, tombstoned included. The
//! write path is supposed to preserve these properties; the sweep exists so
//! tests and operators can prove it did. The first violation found is
//! returned as the error a correct write path would never produce.

use std::collections::HashSet;

use tracing::warn;

use crate::errors::{CoreError, Result};
use crate::ops::Store;
use crate::rating::{compute_normal_rate, visible_comments};

/// Check every store-wide invariant, returning the first violation
///
/// Entities are visited in id order so a given store always reports the
/// same violation first.
///
/// # Errors
///
/// * `WorkflowStateInconsistent` - A comment's `opened` flag disagrees with
///   its review reference
/// * `OrphanedReview` - A visible review no comment references
/// * `StaleRating` - A restaurant's stored `normal_rate` disagrees with its
///   visible comment set
/// * `DanglingCommentRef` - A restaurant references a comment id with no
///   stored comment
/// * `DuplicateComment` - Two visible comments by the same author on the
///   same restaurant
/// * `UserNotFound` / `OwnerRoleRequired` - A restaurant's owner is missing
///   or lacks a manage-capable role
pub fn check_store(store: &Store) -> Result<()> {
    check_workflow_coherence(store)?;
    check_review_linkage(store)?;
    check_restaurants(store)?;
    Ok(())
}

fn sorted_ids<'a, I: Iterator<Item = &'a String>>(ids: I) -> Vec<&'a String> {
    let mut ids: Vec<&String> = ids.collect();
    ids.sort();
    ids
}

/// Invariant: `opened` and `review` always move together
fn check_workflow_coherence(store: &Store) -> Result<()> {
    for id in sorted_ids(store.comments.keys()) {
        let comment = &store.comments[id];
        if comment.workflow_state().is_none() {
            warn!(comment_id = %id, opened = comment.opened, "workflow state inconsistent");
            return Err(CoreError::WorkflowStateInconsistent {
                comment_id: id.clone(),
                opened: comment.opened,
                has_review: comment.review.is_some(),
            });
        }
    }
    Ok(())
}

/// Invariant: every visible review is reachable from some comment
///
/// The scan over comments is tombstone-blind: deleting a comment hides its
/// review from readers but does not orphan it. A visible review with no
/// referencing comment at all is the partial-application artifact.
fn check_review_linkage(store: &Store) -> Result<()> {
    let referenced: HashSet<&str> = store
        .comments
        .values()
        .filter_map(|c| c.review.as_deref())
        .collect();

    for id in sorted_ids(store.reviews.keys()) {
        let review = &store.reviews[id];
        if review.status && !referenced.contains(id.as_str()) {
            warn!(review_id = %id, "orphaned review");
            return Err(CoreError::OrphanedReview {
                review_id: id.clone(),
            });
        }
    }
    Ok(())
}

/// Per-restaurant invariants: reference integrity, rating freshness,
/// one visible comment per author, manage-capable owner
fn check_restaurants(store: &Store) -> Result<()> {
    for id in sorted_ids(store.restaurants.keys()) {
        let restaurant = &store.restaurants[id];

        for comment_id in &restaurant.comment_ids {
            if store.get_comment_raw(comment_id).is_none() {
                return Err(CoreError::DanglingCommentRef {
                    restaurant_id: id.clone(),
                    comment_id: comment_id.clone(),
                });
            }
        }

        let visible = visible_comments(store, restaurant);
        let computed = compute_normal_rate(&visible);
        if restaurant.normal_rate != computed {
            warn!(
                restaurant_id = %id,
                stored = restaurant.normal_rate,
                computed,
                "stale rating"
            );
            return Err(CoreError::StaleRating {
                restaurant_id: id.clone(),
                stored: restaurant.normal_rate,
                computed,
            });
        }

        let mut authors = HashSet::new();
        for comment in &visible {
            if !authors.insert(comment.user.as_str()) {
                return Err(CoreError::DuplicateComment {
                    restaurant_id: id.clone(),
                    user_id: comment.user.clone(),
                });
            }
        }

        match store.get_user_raw(&restaurant.owner) {
            None => {
                return Err(CoreError::UserNotFound {
                    user_id: restaurant.owner.clone(),
                });
            }
            Some(owner) if !owner.role.can_manage() => {
                return Err(CoreError::OwnerRoleRequired {
                    user_id: owner.id.clone(),
                    role: owner.role.as_str().to_string(),
                });
            }
            Some(_) => {}
        }
    }
    Ok(())
}
