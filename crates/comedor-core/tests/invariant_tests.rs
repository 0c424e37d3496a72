//! Every mutation path preserves the store-wide invariants

mod common;

use comedor_core::ops::{comment_ops, restaurant_ops, review_ops, user_ops};
use comedor_core::rules::invariants::check_store;
use comedor_core::Store;
use comedor_core_types::Role;

#[test]
fn test_seeded_platform_is_consistent() {
    let mut store = Store::new();
    common::seed_platform(&mut store);
    check_store(&store).unwrap();
}

#[test]
fn test_invariants_hold_across_the_full_workflow() {
    let mut store = Store::new();
    let platform = common::seed_platform(&mut store);

    let review_id = review_ops::submit_review(
        &mut store,
        &platform.comment_a,
        &platform.owner_id,
        "Thanks!".to_string(),
    )
    .unwrap();
    check_store(&store).unwrap();

    review_ops::retract_review(&mut store, &review_id).unwrap();
    check_store(&store).unwrap();
}

#[test]
fn test_invariants_hold_across_moderation_flips() {
    let mut store = Store::new();
    let platform = common::seed_platform(&mut store);

    comment_ops::delete_comment(&mut store, &platform.comment_a).unwrap();
    check_store(&store).unwrap();

    restaurant_ops::delete_restaurant(&mut store, &platform.restaurant_id).unwrap();
    check_store(&store).unwrap();

    restaurant_ops::restore_restaurant(&mut store, &platform.restaurant_id).unwrap();
    comment_ops::restore_comment(&mut store, &platform.comment_a).unwrap();
    check_store(&store).unwrap();
}

#[test]
fn test_invariants_hold_after_deleting_a_reviewed_comment() {
    let mut store = Store::new();
    let platform = common::seed_platform(&mut store);
    review_ops::submit_review(
        &mut store,
        &platform.comment_a,
        &platform.owner_id,
        "Thanks!".to_string(),
    )
    .unwrap();

    comment_ops::delete_comment(&mut store, &platform.comment_a).unwrap();
    check_store(&store).unwrap();
}

#[test]
fn test_invariants_hold_after_user_churn() {
    let mut store = Store::new();
    let platform = common::seed_platform(&mut store);

    user_ops::delete_user(&mut store, &platform.diner_a).unwrap();
    check_store(&store).unwrap();

    user_ops::restore_user(&mut store, &platform.diner_a).unwrap();
    user_ops::update_user(
        &mut store,
        &platform.diner_a,
        Some("Ana Maria".to_string()),
        None,
        None,
        None,
    )
    .unwrap();
    check_store(&store).unwrap();
}

#[test]
fn test_invariants_hold_after_rate_moderation() {
    let mut store = Store::new();
    let platform = common::seed_platform(&mut store);

    comment_ops::update_comment(&mut store, &platform.comment_b, Some(1), None, None).unwrap();
    check_store(&store).unwrap();

    let second_owner = common::register(&mut store, "Olga", "olga@example.com", Role::Owner);
    restaurant_ops::create_restaurant(
        &mut store,
        "Casa Olga".to_string(),
        "Stew".to_string(),
        &second_owner,
    )
    .unwrap();
    check_store(&store).unwrap();
}
