//! Role-based access policy
//!
//! A pure decision function over the closed [`Action`] enum and the caller
//! identity: no store access, no side effects. Every mutation in the
//! facade runs this check first, so a denial aborts before any write.
//!
//! The lattice is flat: Admin holds every capability; Owner holds the
//! manage-class capabilities on resources it owns (decided by comparing the
//! caller id against the target's owner field); User registers, reads
//! public data and authors comments as itself. Owners never author
//! comments, plain users never create reviews.

use comedor_core_types::{Caller, Role};

use crate::errors::{CoreError, Result};

/// Closed enumeration of the operations the core surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Users
    RegisterUser,
    ListUsers,
    GetUser,
    UpdateUser,
    DeleteUser,
    RestoreUser,
    // Restaurants
    ListRestaurants,
    GetRestaurant,
    CreateRestaurant,
    UpdateRestaurant,
    DeleteRestaurant,
    RestoreRestaurant,
    SearchByOwner,
    SearchWaitingReply,
    SearchByRate,
    // Comments
    ListComments,
    GetComment,
    CreateComment,
    UpdateComment,
    DeleteComment,
    RestoreComment,
    // Reviews
    ListReviews,
    CreateReview,
    UpdateReview,
    RetractReview,
}

fn deny(reason: &str) -> Result<()> {
    Err(CoreError::Forbidden {
        reason: reason.to_string(),
    })
}

/// Require that the caller is the target owner, unless it is an admin
fn require_self_or_admin(caller: &Caller, target_owner: Option<&str>, reason: &str) -> Result<()> {
    if caller.role.is_admin() {
        return Ok(());
    }
    match target_owner {
        Some(owner) if caller.is_self(owner) => Ok(()),
        _ => deny(reason),
    }
}

/// Authorize an operation for a caller
///
/// `target_owner` is the owner-side identity of the resource the action
/// touches (the review's owner, the comment's author, the restaurant's
/// owner, or the user record's own id) where ownership matters; actions
/// that don't compare ownership ignore it.
///
/// # Errors
///
/// Returns `Forbidden` with a human-readable reason when the caller lacks
/// the capability. The check is pure: a denial has no side effects.
pub fn authorize(caller: &Caller, action: Action, target_owner: Option<&str>) -> Result<()> {
    match action {
        // Self-registration is open; public reads need any authenticated role
        Action::RegisterUser
        | Action::ListRestaurants
        | Action::GetRestaurant
        | Action::SearchByRate
        | Action::ListComments
        | Action::GetComment
        | Action::ListReviews => Ok(()),

        // Admin-only moderation surface
        Action::ListUsers
        | Action::GetUser
        | Action::DeleteUser
        | Action::RestoreUser
        | Action::UpdateRestaurant
        | Action::DeleteRestaurant
        | Action::RestoreRestaurant
        | Action::UpdateComment
        | Action::DeleteComment
        | Action::RestoreComment
        | Action::UpdateReview
        | Action::RetractReview => {
            if caller.role.is_admin() {
                Ok(())
            } else {
                deny("The user is not an admin")
            }
        }

        // Admin or the account itself
        Action::UpdateUser => {
            require_self_or_admin(caller, target_owner, "You cannot update another user")
        }

        // Manage-class actions, owner restricted to its own resources
        Action::CreateRestaurant => {
            if !caller.role.can_manage() {
                return deny("The user is not able to manage");
            }
            require_self_or_admin(caller, target_owner, "You cannot specify another owner")
        }
        Action::SearchByOwner | Action::SearchWaitingReply => {
            if !caller.role.can_manage() {
                return deny("The user is not able to manage");
            }
            require_self_or_admin(
                caller,
                target_owner,
                "You cannot search restaurants of another owner",
            )
        }
        Action::CreateReview => {
            if !caller.role.can_manage() {
                return deny("User cannot create reviews");
            }
            require_self_or_admin(
                caller,
                target_owner,
                "You cannot create reviews for another owners",
            )
        }

        // Commenting: never an owner, and users author only as themselves
        Action::CreateComment => {
            if caller.role == Role::Owner {
                return deny("Owner cannot create comments");
            }
            require_self_or_admin(
                caller,
                target_owner,
                "You cannot create comments for another users",
            )
        }
    }
}
