//! Rating aggregation through the public ops

mod common;

use comedor_core::ops::{comment_ops, restaurant_ops};
use comedor_core::Store;
use comedor_core_types::Role;

#[test]
fn test_rating_follows_visible_set_through_deletions() {
    let mut store = Store::new();
    let platform = common::seed_platform(&mut store);
    let diner_c = common::register(&mut store, "Cleo", "cleo@example.com", Role::User);
    let comment_c = common::comment(&mut store, &platform.restaurant_id, &diner_c, 4);

    // [5, 3, 4] -> floor(12 / 3) = 4
    let restaurant = store.get_restaurant(&platform.restaurant_id).unwrap();
    assert_eq!(restaurant.normal_rate, 4);

    // delete the 3 -> floor(9 / 2) = 4
    comment_ops::delete_comment(&mut store, &platform.comment_b).unwrap();
    let restaurant = store.get_restaurant(&platform.restaurant_id).unwrap();
    assert_eq!(restaurant.normal_rate, 4);

    // delete the 4 -> only the 5 remains
    comment_ops::delete_comment(&mut store, &comment_c).unwrap();
    let restaurant = store.get_restaurant(&platform.restaurant_id).unwrap();
    assert_eq!(restaurant.normal_rate, 5);

    // restore the 3 -> floor(8 / 2) = 4
    comment_ops::restore_comment(&mut store, &platform.comment_b).unwrap();
    let restaurant = store.get_restaurant(&platform.restaurant_id).unwrap();
    assert_eq!(restaurant.normal_rate, 4);
}

#[test]
fn test_rating_drops_to_zero_when_all_comments_deleted() {
    let mut store = Store::new();
    let platform = common::seed_platform(&mut store);

    comment_ops::delete_comment(&mut store, &platform.comment_a).unwrap();
    comment_ops::delete_comment(&mut store, &platform.comment_b).unwrap();

    let restaurant = store.get_restaurant(&platform.restaurant_id).unwrap();
    assert_eq!(restaurant.normal_rate, 0);
}

#[test]
fn test_rating_stays_consistent_while_restaurant_tombstoned() {
    let mut store = Store::new();
    let platform = common::seed_platform(&mut store);

    restaurant_ops::delete_restaurant(&mut store, &platform.restaurant_id).unwrap();
    // Comment moderation keeps working against the tombstoned aggregate
    comment_ops::delete_comment(&mut store, &platform.comment_b).unwrap();

    restaurant_ops::restore_restaurant(&mut store, &platform.restaurant_id).unwrap();
    let restaurant = store.get_restaurant(&platform.restaurant_id).unwrap();
    // Only the 5 is visible; no repair pass was needed on restore
    assert_eq!(restaurant.normal_rate, 5);
}

#[test]
fn test_rate_change_recomputes() {
    let mut store = Store::new();
    let platform = common::seed_platform(&mut store);

    comment_ops::update_comment(&mut store, &platform.comment_b, Some(5), None, None).unwrap();
    let restaurant = store.get_restaurant(&platform.restaurant_id).unwrap();
    assert_eq!(restaurant.normal_rate, 5);
}
