use chrono::Utc;
use comedor_core_types::Role;
use uuid::Uuid;

use super::store::Store;
use crate::errors::{CoreError, Result};
use crate::model::User;
use crate::rules::validation::{require_non_blank, validate_email};

/// Register a new user (self-registration)
///
/// The password arrives pre-hashed from the excluded credential layer and
/// is stored as an opaque string. Email uniqueness is enforced against all
/// stored users, deleted accounts included.
///
/// # Arguments
/// * `store` - Mutable reference to the Store
/// * `name` - Display name (must not be blank)
/// * `email` - Email address (must be well-formed and unused)
/// * `password` - Opaque credential (must not be blank)
/// * `role` - Role for the new account
///
/// # Returns
/// The ID of the newly registered user
///
/// # Errors
/// * `InvalidField` - If name, email or password fail validation
/// * `EmailTaken` - If any stored user already holds the email
pub fn register_user(
    store: &mut Store,
    name: String,
    email: String,
    password: String,
    role: Role,
) -> Result<String> {
    require_non_blank("name", &name)?;
    validate_email(&email)?;
    require_non_blank("password", &password)?;

    if store.find_user_by_email(&email).is_some() {
        return Err(CoreError::EmailTaken { email });
    }

    let user_id = Uuid::now_v7().to_string();
    store.insert_user(User::new(user_id.clone(), name, email, password, role));

    Ok(user_id)
}

/// Update a user's profile fields (admin or self)
///
/// Only the provided fields change; the credential is never updated through
/// this path. An email change re-checks uniqueness against everyone else.
///
/// # Errors
/// * `UserNotFound` - If the user doesn't exist or is tombstoned
/// * `InvalidField` - If a provided field fails validation
/// * `EmailTaken` - If the new email belongs to another stored user
pub fn update_user(
    store: &mut Store,
    id: &str,
    name: Option<String>,
    email: Option<String>,
    image: Option<String>,
    role: Option<Role>,
) -> Result<()> {
    if let Some(ref n) = name {
        require_non_blank("name", n)?;
    }
    if let Some(ref e) = email {
        validate_email(e)?;
        if let Some(existing) = store.find_user_by_email(e) {
            if existing.id != id {
                return Err(CoreError::EmailTaken { email: e.clone() });
            }
        }
    }

    let user = store.get_user_mut(id)?;

    if let Some(new_name) = name {
        user.name = new_name;
    }
    if let Some(new_email) = email {
        user.email = new_email;
    }
    if let Some(new_image) = image {
        user.image = Some(new_image);
    }
    if let Some(new_role) = role {
        user.role = new_role;
    }

    user.updated_at = Utc::now();

    Ok(())
}

/// Soft-delete a user (tombstone)
///
/// The record stays in storage; comments and restaurants referencing the
/// user are untouched and simply lose the relation at read time.
///
/// # Errors
/// * `UserNotFound` - If the user doesn't exist or was already deleted
pub fn delete_user(store: &mut Store, id: &str) -> Result<()> {
    let user = store.get_user_mut(id)?;
    user.status = false;
    user.updated_at = Utc::now();
    Ok(())
}

/// Restore a previously soft-deleted user
///
/// Restoring an already-visible user is a no-op.
///
/// # Errors
/// * `UserNotFound` - If no user is stored under the id
pub fn restore_user(store: &mut Store, id: &str) -> Result<()> {
    let user = store
        .get_user_raw_mut(id)
        .ok_or_else(|| CoreError::UserNotFound {
            user_id: id.to_string(),
        })?;
    if !user.status {
        user.status = true;
        user.updated_at = Utc::now();
    }
    Ok(())
}
