use chrono::Utc;
use uuid::Uuid;

use super::store::Store;
use crate::errors::{CoreError, Result};
use crate::model::{Review, WorkflowState};
use crate::rules::validation::require_non_blank;

/// Submit an owner's review against an open comment
///
/// Legal only from the `Open` state on a visible comment. Two writes, not
/// atomic at the store layer: the Review is committed first, then the
/// comment is closed with the review reference. If the second write fails
/// the operation surfaces `PartialApplication` carrying the orphaned review
/// id; no rollback is attempted and the orphan never appears in pruned
/// graphs (nothing references it).
///
/// # Arguments
/// * `store` - Mutable reference to the Store
/// * `comment_id` - The comment being answered
/// * `owner_id` - The answering user (must hold Owner or Admin)
/// * `description` - Answer body (must not be blank)
///
/// # Returns
/// The ID of the newly created review
///
/// # Errors
/// * `InvalidField` - If the description is blank
/// * `UserNotFound` - If the owner doesn't exist or is tombstoned
/// * `Forbidden` - If the owner holds the plain User role
/// * `CommentNotFound` - If no comment is stored under the id
/// * `CommentNotVisible` - If the comment is tombstoned
/// * `CommentAlreadyReviewed` - If the comment is already in `Reviewed`
/// * `PartialApplication` - If the review committed but the comment write
///   failed
pub fn submit_review(
    store: &mut Store,
    comment_id: &str,
    owner_id: &str,
    description: String,
) -> Result<String> {
    require_non_blank("description", &description)?;

    let owner = store.get_user(owner_id)?;
    if !owner.role.can_manage() {
        return Err(CoreError::Forbidden {
            reason: "User cannot create reviews".to_string(),
        });
    }

    // State checks happen before any write so a rejected transition leaves
    // no Review behind
    let comment = store
        .get_comment_raw(comment_id)
        .ok_or_else(|| CoreError::CommentNotFound {
            comment_id: comment_id.to_string(),
        })?;
    if !comment.status {
        return Err(CoreError::CommentNotVisible {
            comment_id: comment_id.to_string(),
        });
    }
    match comment.workflow_state() {
        Some(WorkflowState::Open) => {}
        Some(WorkflowState::Reviewed) => {
            return Err(CoreError::CommentAlreadyReviewed {
                comment_id: comment_id.to_string(),
            });
        }
        None => {
            return Err(CoreError::WorkflowStateInconsistent {
                comment_id: comment_id.to_string(),
                opened: comment.opened,
                has_review: comment.review.is_some(),
            });
        }
    }

    // First write: commit the Review
    let review_id = Uuid::now_v7().to_string();
    store.insert_review(Review::new(
        review_id.clone(),
        description,
        owner_id.to_string(),
    ));

    // Second write: close the comment. A failure here leaves the Review
    // orphaned; surface it as partial application for manual reconciliation.
    match store.get_comment_mut(comment_id) {
        Ok(comment) => {
            comment.opened = false;
            comment.review = Some(review_id.clone());
            comment.updated_at = Utc::now();
        }
        Err(err) => {
            return Err(CoreError::PartialApplication {
                review_id,
                message: err.to_string(),
            });
        }
    }

    Ok(review_id)
}

/// Retract a review, reopening its comment
///
/// Legal from `Reviewed` only: the review must be visible and referenced by
/// a visible comment. Tombstones the review and returns the comment to
/// `Open` with the reference cleared.
///
/// # Arguments
/// * `store` - Mutable reference to the Store
/// * `review_id` - The review to retract
///
/// # Returns
/// The ID of the reopened comment
///
/// # Errors
/// * `ReviewNotFound` - If the review doesn't exist or was already retracted
/// * `ReviewDetached` - If no visible comment references the review
pub fn retract_review(store: &mut Store, review_id: &str) -> Result<String> {
    // Both lookups before either write, so a failure mutates nothing
    store.get_review(review_id)?;
    let comment_id = store
        .find_comment_by_review(review_id)
        .map(|c| c.id.clone())
        .ok_or_else(|| CoreError::ReviewDetached {
            review_id: review_id.to_string(),
        })?;

    let review = store.get_review_mut(review_id)?;
    review.status = false;
    review.updated_at = Utc::now();

    let comment = store.get_comment_mut(&comment_id)?;
    comment.opened = true;
    comment.review = None;
    comment.updated_at = Utc::now();

    Ok(comment_id)
}

/// Update a review's description (admin moderation)
///
/// # Errors
/// * `ReviewNotFound` - If the review doesn't exist or is tombstoned
/// * `InvalidField` - If the new description is blank
pub fn update_review(store: &mut Store, id: &str, description: Option<String>) -> Result<()> {
    if let Some(ref d) = description {
        require_non_blank("description", d)?;
    }

    let review = store.get_review_mut(id)?;
    if let Some(new_description) = description {
        review.description = new_description;
    }
    review.updated_at = Utc::now();

    Ok(())
}
