//! Rating aggregator
//!
//! `normal_rate` is derived state: the floor of the mean rate over the
//! restaurant's currently visible comments, 0 if there are none. It is
//! recomputed from the visible set after every comment-affecting write
//! rather than adjusted incrementally, which makes the operation idempotent
//! and self-healing after status flips.

use tracing::debug;

use crate::errors::{CoreError, Result};
use crate::model::{Comment, Restaurant};
use crate::ops::Store;

/// Resolve the visible comments referenced by a restaurant
///
/// Dangling references (comment id with no stored comment) are skipped:
/// the store gives no cross-entity guarantees, and a missing comment must
/// not poison the aggregate.
pub fn visible_comments<'a>(store: &'a Store, restaurant: &Restaurant) -> Vec<&'a Comment> {
    restaurant
        .comment_ids
        .iter()
        .filter_map(|id| store.get_comment_raw(id))
        .filter(|c| c.status)
        .collect()
}

/// Compute the summary rating over a comment set
///
/// floor(sum(rate) / count), 0 for the empty set.
pub fn compute_normal_rate(comments: &[&Comment]) -> u8 {
    if comments.is_empty() {
        return 0;
    }
    let total: u32 = comments.iter().map(|c| u32::from(c.rate)).sum();
    (total / comments.len() as u32) as u8
}

/// Recompute and persist a restaurant's `normal_rate`
///
/// Works on tombstoned restaurants too: derived state stays consistent
/// while the restaurant is invisible so a later restore needs no repair.
/// Idempotent - recomputing with no intervening writes is a no-op.
///
/// # Errors
///
/// Returns `RestaurantNotFound` if no restaurant is stored under the id.
pub fn recompute(store: &mut Store, restaurant_id: &str) -> Result<u8> {
    let restaurant =
        store
            .get_restaurant_raw(restaurant_id)
            .ok_or_else(|| CoreError::RestaurantNotFound {
                restaurant_id: restaurant_id.to_string(),
            })?;

    let comments = visible_comments(store, restaurant);
    let normal_rate = compute_normal_rate(&comments);

    debug!(
        restaurant_id,
        normal_rate,
        visible_comments = comments.len(),
        "recomputed rating"
    );

    // Lookup again for the write; the raw getter above only borrows
    let restaurant = store
        .get_restaurant_raw_mut(restaurant_id)
        .ok_or_else(|| CoreError::RestaurantNotFound {
            restaurant_id: restaurant_id.to_string(),
        })?;
    restaurant.normal_rate = normal_rate;

    Ok(normal_rate)
}
