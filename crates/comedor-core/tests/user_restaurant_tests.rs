//! User and restaurant lifecycle through the public ops

mod common;

use comedor_core::ops::{restaurant_ops, user_ops};
use comedor_core::queries::moderation_queries;
use comedor_core::{CoreError, ErrorKind, Store};
use comedor_core_types::Role;

#[test]
fn test_email_stays_reserved_by_deleted_accounts() {
    let mut store = Store::new();
    let platform = common::seed_platform(&mut store);

    user_ops::delete_user(&mut store, &platform.diner_a).unwrap();

    let result = user_ops::register_user(
        &mut store,
        "Impostor".to_string(),
        "ana@example.com".to_string(),
        "hash".to_string(),
        Role::User,
    );
    assert!(matches!(result, Err(CoreError::EmailTaken { .. })));
}

#[test]
fn test_update_user_rejects_email_of_another_account() {
    let mut store = Store::new();
    let platform = common::seed_platform(&mut store);

    let result = user_ops::update_user(
        &mut store,
        &platform.diner_a,
        None,
        Some("ben@example.com".to_string()),
        None,
        None,
    );
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Validation);

    // Re-submitting one's own address is fine
    user_ops::update_user(
        &mut store,
        &platform.diner_a,
        None,
        Some("ana@example.com".to_string()),
        None,
        None,
    )
    .unwrap();
}

#[test]
fn test_malformed_email_rejected() {
    let mut store = Store::new();
    for bad in ["", "no-at-sign", "@example.com", "ana@"] {
        let result = user_ops::register_user(
            &mut store,
            "Ana".to_string(),
            bad.to_string(),
            "hash".to_string(),
            Role::User,
        );
        assert_eq!(
            result.unwrap_err().kind(),
            ErrorKind::Validation,
            "accepted {bad:?}"
        );
    }
}

#[test]
fn test_user_delete_restore_round_trip() {
    let mut store = Store::new();
    let platform = common::seed_platform(&mut store);

    user_ops::delete_user(&mut store, &platform.diner_a).unwrap();
    assert!(moderation_queries::get_user(&store, &platform.diner_a).is_err());

    user_ops::restore_user(&mut store, &platform.diner_a).unwrap();
    let view = moderation_queries::get_user(&store, &platform.diner_a).unwrap();
    assert_eq!(view.email, "ana@example.com");

    // Restore is idempotent
    user_ops::restore_user(&mut store, &platform.diner_a).unwrap();
}

#[test]
fn test_list_users_counts_only_visible() {
    let mut store = Store::new();
    let platform = common::seed_platform(&mut store);

    let (_, before) = moderation_queries::list_users(&store, 0);
    user_ops::delete_user(&mut store, &platform.diner_b).unwrap();
    let (page, after) = moderation_queries::list_users(&store, 0);

    assert_eq!(after, before - 1);
    assert!(page.iter().all(|u| u.id != platform.diner_b));
}

#[test]
fn test_restaurant_requires_manage_capable_owner() {
    let mut store = Store::new();
    let platform = common::seed_platform(&mut store);

    let result = restaurant_ops::create_restaurant(
        &mut store,
        "Ana's Place".to_string(),
        "Home cooking".to_string(),
        &platform.diner_a,
    );
    assert!(matches!(result, Err(CoreError::OwnerRoleRequired { .. })));

    // Admin qualifies as manage-capable
    restaurant_ops::create_restaurant(
        &mut store,
        "Admin Annex".to_string(),
        "Cafeteria".to_string(),
        &platform.admin_id,
    )
    .unwrap();
}

#[test]
fn test_restaurant_update_cannot_touch_derived_state() {
    let mut store = Store::new();
    let platform = common::seed_platform(&mut store);
    let rate_before = store
        .get_restaurant(&platform.restaurant_id)
        .unwrap()
        .normal_rate;

    restaurant_ops::update_restaurant(
        &mut store,
        &platform.restaurant_id,
        Some("La Mesa Nueva".to_string()),
        None,
        Some("mesa.png".to_string()),
    )
    .unwrap();

    let restaurant = store.get_restaurant(&platform.restaurant_id).unwrap();
    assert_eq!(restaurant.name, "La Mesa Nueva");
    assert_eq!(restaurant.normal_rate, rate_before);
    assert!(restaurant.status);
}

#[test]
fn test_restaurant_delete_restore_keeps_comment_links() {
    let mut store = Store::new();
    let platform = common::seed_platform(&mut store);

    restaurant_ops::delete_restaurant(&mut store, &platform.restaurant_id).unwrap();
    restaurant_ops::restore_restaurant(&mut store, &platform.restaurant_id).unwrap();

    let restaurant = store.get_restaurant(&platform.restaurant_id).unwrap();
    assert_eq!(restaurant.comment_ids.len(), 2);
    assert_eq!(restaurant.normal_rate, 4);
}

#[test]
fn test_blank_fields_rejected() {
    let mut store = Store::new();
    let platform = common::seed_platform(&mut store);

    let result = restaurant_ops::create_restaurant(
        &mut store,
        "  ".to_string(),
        "Tapas".to_string(),
        &platform.owner_id,
    );
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Validation);

    let result = user_ops::update_user(
        &mut store,
        &platform.diner_a,
        Some(String::new()),
        None,
        None,
        None,
    );
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Validation);
}
