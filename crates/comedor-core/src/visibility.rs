//! Visibility filter: expand + prune over entity graphs
//!
//! The single mandatory choke point between stored entities and callers.
//! `expand_*` resolves relation paths into owned view graphs with an
//! iterative, breadth-first worklist (never unbounded recursion) and is
//! deliberately tombstone-blind; `prune_*` is a separate pass that drops
//! every node whose `status` is false together with everything reachable
//! only through it. Every read surface goes expand → prune.
//!
//! Pruning is idempotent and order-independent, and never mutates stored
//! entities - it only shapes the returned view. Views are the payloads the
//! excluded HTTP layer serializes; `UserView` never carries the credential.

use serde::{Deserialize, Serialize};

use crate::model::{Comment, Restaurant, Review, User};
use crate::ops::Store;

/// User as exposed to callers - no credential field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: comedor_core_types::Role,
    pub image: Option<String>,
    pub status: bool,
}

impl UserView {
    pub(crate) fn from_entity(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            image: user.image.clone(),
            status: user.status,
        }
    }
}

/// Review with its owner relation resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewView {
    pub id: String,
    pub description: String,
    pub owner: Option<UserView>,
    pub status: bool,
}

impl ReviewView {
    pub(crate) fn from_entity(review: &Review) -> Self {
        Self {
            id: review.id.clone(),
            description: review.description.clone(),
            owner: None,
            status: review.status,
        }
    }
}

/// Comment with author and review relations resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: String,
    pub rate: u8,
    pub title: String,
    pub description: String,
    pub user: Option<UserView>,
    pub review: Option<ReviewView>,
    pub opened: bool,
    pub status: bool,
}

impl CommentView {
    pub(crate) fn from_entity(comment: &Comment) -> Self {
        Self {
            id: comment.id.clone(),
            rate: comment.rate,
            title: comment.title.clone(),
            description: comment.description.clone(),
            user: None,
            review: None,
            opened: comment.opened,
            status: comment.status,
        }
    }
}

/// Restaurant with owner and comment relations resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: Option<UserView>,
    pub comments: Vec<CommentView>,
    pub normal_rate: u8,
    pub image: Option<String>,
    pub status: bool,
}

impl RestaurantView {
    pub(crate) fn from_entity(restaurant: &Restaurant) -> Self {
        Self {
            id: restaurant.id.clone(),
            name: restaurant.name.clone(),
            description: restaurant.description.clone(),
            owner: None,
            comments: Vec::new(),
            normal_rate: restaurant.normal_rate,
            image: restaurant.image.clone(),
            status: restaurant.status,
        }
    }
}

// ===== Expansion =====

/// Expand a review one level deep: resolve its owner
pub fn expand_review(store: &Store, review: &Review) -> ReviewView {
    let mut view = ReviewView::from_entity(review);
    view.owner = store.get_user_raw(&review.owner).map(UserView::from_entity);
    view
}

/// Expand a comment: resolve its author and, if present, its review with
/// the review's owner
pub fn expand_comment(store: &Store, comment: &Comment) -> CommentView {
    let mut view = CommentView::from_entity(comment);
    view.user = store.get_user_raw(&comment.user).map(UserView::from_entity);
    if let Some(review_id) = &comment.review {
        view.review = store
            .get_review_raw(review_id)
            .map(|r| expand_review(store, r));
    }
    view
}

/// Expand a restaurant to full depth: owner, comments, comment authors,
/// reviews and review owners
///
/// Resolution is an iterative breadth-first sweep: first the direct
/// relations of the restaurant, then one level per pass over a worklist of
/// unresolved comment ids. Dangling references are dropped silently - the
/// store gives no cross-entity guarantees.
pub fn expand_restaurant(store: &Store, restaurant: &Restaurant) -> RestaurantView {
    let mut view = RestaurantView::from_entity(restaurant);

    // Level 1: direct relations
    view.owner = store
        .get_user_raw(&restaurant.owner)
        .map(UserView::from_entity);
    let mut worklist: Vec<&Comment> = restaurant
        .comment_ids
        .iter()
        .filter_map(|id| store.get_comment_raw(id))
        .collect();

    // Level 2+: comments and their relations, in reference order
    for comment in worklist.drain(..) {
        view.comments.push(expand_comment(store, comment));
    }

    view
}

// ===== Pruning =====

fn prune_user(user: Option<UserView>) -> Option<UserView> {
    user.filter(|u| u.status)
}

/// Prune a review view: drop it if tombstoned, drop its owner if invisible
pub fn prune_review(review: ReviewView) -> Option<ReviewView> {
    if !review.status {
        return None;
    }
    Some(ReviewView {
        owner: prune_user(review.owner),
        ..review
    })
}

/// Prune a comment view: drop it if tombstoned, prune its relations
pub fn prune_comment(comment: CommentView) -> Option<CommentView> {
    if !comment.status {
        return None;
    }
    Some(CommentView {
        user: prune_user(comment.user),
        review: comment.review.and_then(prune_review),
        ..comment
    })
}

/// Prune a restaurant view: drop it if tombstoned, prune every relation
/// recursively (innermost first by construction)
pub fn prune_restaurant(restaurant: RestaurantView) -> Option<RestaurantView> {
    if !restaurant.status {
        return None;
    }
    Some(RestaurantView {
        owner: prune_user(restaurant.owner),
        comments: restaurant
            .comments
            .into_iter()
            .filter_map(prune_comment)
            .collect(),
        ..restaurant
    })
}
