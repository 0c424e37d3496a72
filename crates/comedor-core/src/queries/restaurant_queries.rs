use crate::errors::{CoreError, Result};
use crate::ops::Store;
use crate::visibility::{expand_restaurant, prune_restaurant, RestaurantView};

/// List visible restaurants, fully expanded and pruned
pub fn list_restaurants(store: &Store, from: usize) -> Vec<RestaurantView> {
    store
        .list_restaurants()
        .into_iter()
        .skip(from)
        .filter_map(|r| prune_restaurant(expand_restaurant(store, r)))
        .collect()
}

/// Get one visible restaurant, fully expanded and pruned
///
/// # Errors
///
/// Returns `RestaurantNotFound` if the restaurant doesn't exist or is
/// tombstoned.
pub fn get_restaurant(store: &Store, id: &str) -> Result<RestaurantView> {
    let restaurant = store.get_restaurant(id)?;
    // The restaurant is visible, so pruning keeps the root node
    prune_restaurant(expand_restaurant(store, restaurant)).ok_or_else(|| {
        CoreError::RestaurantNotFound {
            restaurant_id: id.to_string(),
        }
    })
}

/// Visible restaurants belonging to one owner
pub fn search_by_owner(store: &Store, owner_id: &str, from: usize) -> Vec<RestaurantView> {
    store
        .list_restaurants()
        .into_iter()
        .filter(|r| r.owner == owner_id)
        .skip(from)
        .filter_map(|r| prune_restaurant(expand_restaurant(store, r)))
        .collect()
}

/// Visible restaurants of one owner, comments narrowed to those still
/// awaiting a review (the owner's work queue)
pub fn search_waiting_reply(store: &Store, owner_id: &str, from: usize) -> Vec<RestaurantView> {
    search_by_owner(store, owner_id, from)
        .into_iter()
        .map(|mut view| {
            view.comments.retain(|c| c.opened);
            view
        })
        .collect()
}

/// Visible restaurants rated at or above `min_rate`
pub fn search_by_rate(store: &Store, min_rate: u8, from: usize) -> Vec<RestaurantView> {
    store
        .list_restaurants()
        .into_iter()
        .filter(|r| r.normal_rate >= min_rate)
        .skip(from)
        .filter_map(|r| prune_restaurant(expand_restaurant(store, r)))
        .collect()
}
