use chrono::Utc;
use uuid::Uuid;

use super::store::Store;
use crate::errors::{CoreError, Result};
use crate::model::Restaurant;
use crate::rating;
use crate::rules::validation::require_non_blank;

/// Create a new restaurant
///
/// The referenced owner must exist, be visible, and hold the Owner or
/// Admin role at creation time. Whether the *caller* may assign this owner
/// is the access policy's concern, checked before this op runs.
///
/// # Arguments
/// * `store` - Mutable reference to the Store
/// * `name` - Restaurant name (must not be blank)
/// * `description` - Description (must not be blank)
/// * `owner_id` - ID of the owning user
///
/// # Returns
/// The ID of the newly created restaurant
///
/// # Errors
/// * `InvalidField` - If name or description are blank
/// * `UserNotFound` - If the owner doesn't exist or is tombstoned
/// * `OwnerRoleRequired` - If the owner holds the plain User role
pub fn create_restaurant(
    store: &mut Store,
    name: String,
    description: String,
    owner_id: &str,
) -> Result<String> {
    require_non_blank("name", &name)?;
    require_non_blank("description", &description)?;

    let owner = store.get_user(owner_id)?;
    if !owner.role.can_manage() {
        return Err(CoreError::OwnerRoleRequired {
            user_id: owner_id.to_string(),
            role: owner.role.to_string(),
        });
    }

    let restaurant_id = Uuid::now_v7().to_string();
    store.insert_restaurant(Restaurant::new(
        restaurant_id.clone(),
        name,
        description,
        owner_id.to_string(),
    ));

    Ok(restaurant_id)
}

/// Update a restaurant's descriptive fields
///
/// Only name, description and image are writable here. `normal_rate` is
/// owned by the rating aggregator and `status` by the delete/restore ops.
///
/// # Errors
/// * `RestaurantNotFound` - If the restaurant doesn't exist or is tombstoned
/// * `InvalidField` - If a provided field is blank
pub fn update_restaurant(
    store: &mut Store,
    id: &str,
    name: Option<String>,
    description: Option<String>,
    image: Option<String>,
) -> Result<()> {
    if let Some(ref n) = name {
        require_non_blank("name", n)?;
    }
    if let Some(ref d) = description {
        require_non_blank("description", d)?;
    }

    let restaurant = store.get_restaurant_mut(id)?;

    if let Some(new_name) = name {
        restaurant.name = new_name;
    }
    if let Some(new_description) = description {
        restaurant.description = new_description;
    }
    if let Some(new_image) = image {
        restaurant.image = Some(new_image);
    }

    restaurant.updated_at = Utc::now();

    Ok(())
}

/// Soft-delete a restaurant (tombstone)
///
/// Comments keep their own status; the rating is recomputed afterwards so
/// derived state stays consistent for an eventual restore.
///
/// # Errors
/// * `RestaurantNotFound` - If the restaurant doesn't exist or was already
///   deleted
pub fn delete_restaurant(store: &mut Store, id: &str) -> Result<()> {
    let restaurant = store.get_restaurant_mut(id)?;
    restaurant.status = false;
    restaurant.updated_at = Utc::now();

    rating::recompute(store, id)?;
    Ok(())
}

/// Restore a previously soft-deleted restaurant
///
/// Recomputes the rating over the currently visible comment set: comments
/// may have been flipped while the restaurant was invisible. Restoring an
/// already-visible restaurant is a no-op.
///
/// # Errors
/// * `RestaurantNotFound` - If no restaurant is stored under the id
pub fn restore_restaurant(store: &mut Store, id: &str) -> Result<()> {
    let restaurant =
        store
            .get_restaurant_raw_mut(id)
            .ok_or_else(|| CoreError::RestaurantNotFound {
                restaurant_id: id.to_string(),
            })?;
    if !restaurant.status {
        restaurant.status = true;
        restaurant.updated_at = Utc::now();
        rating::recompute(store, id)?;
    }
    Ok(())
}
