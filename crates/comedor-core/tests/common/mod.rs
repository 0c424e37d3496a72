//! Shared fixtures for integration tests

// Not every test binary uses every helper
#![allow(dead_code)]

use comedor_core::ops::{comment_ops, restaurant_ops, user_ops};
use comedor_core::Store;
use comedor_core_types::Role;

/// Ids of a small populated platform: one owner with a restaurant, one
/// admin, and two diners with visible comments rated 5 and 3.
pub struct Platform {
    pub owner_id: String,
    pub admin_id: String,
    pub diner_a: String,
    pub diner_b: String,
    pub restaurant_id: String,
    pub comment_a: String,
    pub comment_b: String,
}

pub fn register(store: &mut Store, name: &str, email: &str, role: Role) -> String {
    user_ops::register_user(
        store,
        name.to_string(),
        email.to_string(),
        "hashed-credential".to_string(),
        role,
    )
    .unwrap()
}

pub fn comment(store: &mut Store, restaurant_id: &str, user_id: &str, rate: u8) -> String {
    comment_ops::create_comment(
        store,
        restaurant_id,
        user_id,
        rate,
        format!("rated {rate}"),
        String::new(),
    )
    .unwrap()
}

pub fn seed_platform(store: &mut Store) -> Platform {
    let owner_id = register(store, "Owner", "owner@example.com", Role::Owner);
    let admin_id = register(store, "Admin", "admin@example.com", Role::Admin);
    let diner_a = register(store, "Ana", "ana@example.com", Role::User);
    let diner_b = register(store, "Ben", "ben@example.com", Role::User);

    let restaurant_id = restaurant_ops::create_restaurant(
        store,
        "La Mesa".to_string(),
        "Tapas and more".to_string(),
        &owner_id,
    )
    .unwrap();

    let comment_a = comment(store, &restaurant_id, &diner_a, 5);
    let comment_b = comment(store, &restaurant_id, &diner_b, 3);

    Platform {
        owner_id,
        admin_id,
        diner_a,
        diner_b,
        restaurant_id,
        comment_a,
        comment_b,
    }
}
