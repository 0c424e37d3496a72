//! Comedor Engine - Orchestration layer
//!
//! The facade callers program against. Every operation runs the same
//! pipeline: authorize → serialize on the aggregate lock (writes only) →
//! validate and mutate through the core ops → recompute derived state →
//! expand and prune into a view.
//!
//! The engine owns the concurrency story the core stays out of: the store
//! sits behind an `RwLock`, and multi-entity write sequences additionally
//! serialize on a per-aggregate mutex (restaurant id for comment writes,
//! comment id for the review workflow). Lock order is always aggregate
//! first, store second. Reads take only the store read lock and may observe
//! `normal_rate` one write stale, but never a tombstoned entity. A poisoned
//! lock surfaces as `StoreUnavailable`; callers may retry, the engine never
//! does.

mod locks;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::info;

use comedor_core::ops::{comment_ops, restaurant_ops, review_ops, user_ops};
use comedor_core::queries::{moderation_queries, restaurant_queries};
use comedor_core::rules::invariants;
use comedor_core::visibility::{expand_review, prune_review};
use comedor_core::{
    authorize, Action, CommentView, CoreError, RestaurantView, Result, ReviewView, Store, UserView,
};
use comedor_core_types::{Caller, RequestContext, Role};

use crate::locks::AggregateLocks;

fn lock_poisoned(what: &str) -> CoreError {
    CoreError::StoreUnavailable {
        message: format!("{what} lock poisoned"),
    }
}

/// The operation facade over one store
#[derive(Debug, Default)]
pub struct Engine {
    store: RwLock<Store>,
    locks: AggregateLocks,
}

impl Engine {
    /// Build an engine over an explicit store handle
    pub fn new(store: Store) -> Self {
        Self {
            store: RwLock::new(store),
            locks: AggregateLocks::new(),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Store>> {
        self.store.read().map_err(|_| lock_poisoned("store"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Store>> {
        self.store.write().map_err(|_| lock_poisoned("store"))
    }

    /// Clone the current store state (test and tooling support)
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the store lock is poisoned.
    pub fn snapshot(&self) -> Result<Store> {
        Ok(self.read()?.clone())
    }

    /// Run the full invariant sweep over the current state
    ///
    /// # Errors
    ///
    /// Returns the first invariant violation, or `StoreUnavailable` if the
    /// store lock is poisoned.
    pub fn check_invariants(&self) -> Result<()> {
        invariants::check_store(&*self.read()?)
    }

    // ===== Users =====

    /// Register a new account (self-registration, open to anyone)
    ///
    /// # Errors
    ///
    /// Propagates validation and `EmailTaken` errors from the core op.
    pub fn register_user(
        &self,
        caller: &Caller,
        name: String,
        email: String,
        password: String,
        role: Role,
    ) -> Result<UserView> {
        authorize(caller, Action::RegisterUser, None)?;
        let ctx = RequestContext::new();
        let mut store = self.write()?;
        let id = user_ops::register_user(&mut store, name, email, password, role)?;
        info!(op = "register_user", request_id = %ctx.request_id, user_id = %id, "user registered");
        moderation_queries::get_user(&store, &id)
    }

    /// List visible users with the total visible count (admin)
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admin callers.
    pub fn list_users(&self, caller: &Caller, from: usize) -> Result<(Vec<UserView>, usize)> {
        authorize(caller, Action::ListUsers, None)?;
        Ok(moderation_queries::list_users(&*self.read()?, from))
    }

    /// Get one visible user (admin)
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admin callers, `UserNotFound` otherwise.
    pub fn get_user(&self, caller: &Caller, id: &str) -> Result<UserView> {
        authorize(caller, Action::GetUser, None)?;
        moderation_queries::get_user(&*self.read()?, id)
    }

    /// Update a user's profile (the account itself or an admin)
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` when the caller is neither the account nor an
    /// admin; propagates validation and `UserNotFound` errors.
    pub fn update_user(
        &self,
        caller: &Caller,
        id: &str,
        name: Option<String>,
        email: Option<String>,
        image: Option<String>,
        role: Option<Role>,
    ) -> Result<UserView> {
        authorize(caller, Action::UpdateUser, Some(id))?;
        let mut store = self.write()?;
        user_ops::update_user(&mut store, id, name, email, image, role)?;
        moderation_queries::get_user(&store, id)
    }

    /// Soft-delete a user (admin)
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admin callers, `UserNotFound` otherwise.
    pub fn delete_user(&self, caller: &Caller, id: &str) -> Result<()> {
        authorize(caller, Action::DeleteUser, None)?;
        let ctx = RequestContext::new();
        let mut store = self.write()?;
        user_ops::delete_user(&mut store, id)?;
        info!(op = "delete_user", request_id = %ctx.request_id, user_id = %id, "user tombstoned");
        Ok(())
    }

    /// Restore a soft-deleted user (admin)
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admin callers, `UserNotFound` if no user
    /// is stored under the id.
    pub fn restore_user(&self, caller: &Caller, id: &str) -> Result<()> {
        authorize(caller, Action::RestoreUser, None)?;
        let mut store = self.write()?;
        user_ops::restore_user(&mut store, id)
    }

    // ===== Restaurants =====

    /// List visible restaurants (open read)
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the store lock is poisoned.
    pub fn list_restaurants(&self, caller: &Caller, from: usize) -> Result<Vec<RestaurantView>> {
        authorize(caller, Action::ListRestaurants, None)?;
        Ok(restaurant_queries::list_restaurants(&*self.read()?, from))
    }

    /// Get one visible restaurant, fully expanded (open read)
    ///
    /// # Errors
    ///
    /// Returns `RestaurantNotFound` if the restaurant doesn't exist or is
    /// tombstoned.
    pub fn get_restaurant(&self, caller: &Caller, id: &str) -> Result<RestaurantView> {
        authorize(caller, Action::GetRestaurant, None)?;
        restaurant_queries::get_restaurant(&*self.read()?, id)
    }

    /// Create a restaurant for a manage-capable owner
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` unless the caller is the owner (or an admin) and
    /// holds a manage-capable role; propagates validation errors.
    pub fn create_restaurant(
        &self,
        caller: &Caller,
        name: String,
        description: String,
        owner_id: &str,
    ) -> Result<RestaurantView> {
        authorize(caller, Action::CreateRestaurant, Some(owner_id))?;
        let ctx = RequestContext::new();
        let mut store = self.write()?;
        let id = restaurant_ops::create_restaurant(&mut store, name, description, owner_id)?;
        info!(
            op = "create_restaurant",
            request_id = %ctx.request_id,
            restaurant_id = %id,
            owner_id,
            "restaurant created"
        );
        restaurant_queries::get_restaurant(&store, &id)
    }

    /// Update a restaurant's descriptive fields (admin moderation)
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admin callers; propagates validation and
    /// `RestaurantNotFound` errors.
    pub fn update_restaurant(
        &self,
        caller: &Caller,
        id: &str,
        name: Option<String>,
        description: Option<String>,
        image: Option<String>,
    ) -> Result<RestaurantView> {
        authorize(caller, Action::UpdateRestaurant, None)?;
        let mut store = self.write()?;
        restaurant_ops::update_restaurant(&mut store, id, name, description, image)?;
        restaurant_queries::get_restaurant(&store, id)
    }

    /// Soft-delete a restaurant (admin)
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admin callers, `RestaurantNotFound`
    /// otherwise.
    pub fn delete_restaurant(&self, caller: &Caller, id: &str) -> Result<()> {
        authorize(caller, Action::DeleteRestaurant, None)?;
        let aggregate = self.locks.for_aggregate(id)?;
        let _serial = aggregate.lock().map_err(|_| lock_poisoned("aggregate"))?;
        let ctx = RequestContext::new();
        let mut store = self.write()?;
        restaurant_ops::delete_restaurant(&mut store, id)?;
        info!(op = "delete_restaurant", request_id = %ctx.request_id, restaurant_id = %id, "restaurant tombstoned");
        Ok(())
    }

    /// Restore a soft-deleted restaurant (admin)
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admin callers, `RestaurantNotFound` if no
    /// restaurant is stored under the id.
    pub fn restore_restaurant(&self, caller: &Caller, id: &str) -> Result<()> {
        authorize(caller, Action::RestoreRestaurant, None)?;
        let aggregate = self.locks.for_aggregate(id)?;
        let _serial = aggregate.lock().map_err(|_| lock_poisoned("aggregate"))?;
        let mut store = self.write()?;
        restaurant_ops::restore_restaurant(&mut store, id)
    }

    /// Visible restaurants of one owner (the owner itself or an admin)
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` unless the caller is the owner or an admin.
    pub fn search_by_owner(
        &self,
        caller: &Caller,
        owner_id: &str,
        from: usize,
    ) -> Result<Vec<RestaurantView>> {
        authorize(caller, Action::SearchByOwner, Some(owner_id))?;
        Ok(restaurant_queries::search_by_owner(
            &*self.read()?,
            owner_id,
            from,
        ))
    }

    /// The owner's work queue: its restaurants with only unanswered comments
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` unless the caller is the owner or an admin.
    pub fn search_waiting_reply(
        &self,
        caller: &Caller,
        owner_id: &str,
        from: usize,
    ) -> Result<Vec<RestaurantView>> {
        authorize(caller, Action::SearchWaitingReply, Some(owner_id))?;
        Ok(restaurant_queries::search_waiting_reply(
            &*self.read()?,
            owner_id,
            from,
        ))
    }

    /// Visible restaurants rated at or above a threshold (open read)
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the store lock is poisoned.
    pub fn search_by_rate(
        &self,
        caller: &Caller,
        min_rate: u8,
        from: usize,
    ) -> Result<Vec<RestaurantView>> {
        authorize(caller, Action::SearchByRate, None)?;
        Ok(restaurant_queries::search_by_rate(
            &*self.read()?,
            min_rate,
            from,
        ))
    }

    // ===== Comments =====

    /// List visible comments (open read)
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the store lock is poisoned.
    pub fn list_comments(&self, caller: &Caller, from: usize) -> Result<Vec<CommentView>> {
        authorize(caller, Action::ListComments, None)?;
        Ok(moderation_queries::list_comments(&*self.read()?, from))
    }

    /// Get one visible comment with relations resolved (open read)
    ///
    /// # Errors
    ///
    /// Returns `CommentNotFound` if the comment doesn't exist or is
    /// tombstoned.
    pub fn get_comment(&self, caller: &Caller, id: &str) -> Result<CommentView> {
        authorize(caller, Action::GetComment, None)?;
        moderation_queries::get_comment(&*self.read()?, id)
    }

    /// Author a comment against a restaurant
    ///
    /// Serialized per restaurant so the duplicate check and the rating
    /// recompute of concurrent authors cannot interleave.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for owner-role authors and for callers writing
    /// as another user; propagates `DuplicateComment`, validation and
    /// not-found errors.
    pub fn create_comment(
        &self,
        caller: &Caller,
        restaurant_id: &str,
        user_id: &str,
        rate: u8,
        title: String,
        description: String,
    ) -> Result<CommentView> {
        authorize(caller, Action::CreateComment, Some(user_id))?;
        let aggregate = self.locks.for_aggregate(restaurant_id)?;
        let _serial = aggregate.lock().map_err(|_| lock_poisoned("aggregate"))?;
        let mut store = self.write()?;
        let ctx = RequestContext::new();
        let id =
            comment_ops::create_comment(&mut store, restaurant_id, user_id, rate, title, description)?;
        info!(
            op = "create_comment",
            request_id = %ctx.request_id,
            comment_id = %id,
            restaurant_id,
            "comment created"
        );
        moderation_queries::get_comment(&store, &id)
    }

    /// Update a comment's content fields (admin moderation)
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admin callers; propagates validation and
    /// `CommentNotFound` errors.
    pub fn update_comment(
        &self,
        caller: &Caller,
        id: &str,
        rate: Option<u8>,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<CommentView> {
        authorize(caller, Action::UpdateComment, None)?;
        let handle = self.owning_restaurant_lock(id)?;
        let _serial = lock_handle(&handle)?;
        let mut store = self.write()?;
        comment_ops::update_comment(&mut store, id, rate, title, description)?;
        moderation_queries::get_comment(&store, id)
    }

    /// Soft-delete a comment (admin)
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admin callers, `CommentNotFound`
    /// otherwise.
    pub fn delete_comment(&self, caller: &Caller, id: &str) -> Result<()> {
        authorize(caller, Action::DeleteComment, None)?;
        let handle = self.owning_restaurant_lock(id)?;
        let _serial = lock_handle(&handle)?;
        let ctx = RequestContext::new();
        let mut store = self.write()?;
        comment_ops::delete_comment(&mut store, id)?;
        info!(op = "delete_comment", request_id = %ctx.request_id, comment_id = %id, "comment tombstoned");
        Ok(())
    }

    /// Restore a soft-deleted comment (admin)
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admin callers, `CommentNotFound` if no
    /// comment is stored under the id.
    pub fn restore_comment(&self, caller: &Caller, id: &str) -> Result<()> {
        authorize(caller, Action::RestoreComment, None)?;
        let handle = self.owning_restaurant_lock(id)?;
        let _serial = lock_handle(&handle)?;
        let mut store = self.write()?;
        comment_ops::restore_comment(&mut store, id)
    }

    // Comment writes serialize on the owning restaurant, the same key the
    // create path uses. An unreferenced comment has nothing to serialize
    // against.
    fn owning_restaurant_lock(&self, comment_id: &str) -> Result<Option<AggregateHandle>> {
        let restaurant_id = self
            .read()?
            .find_restaurant_by_comment(comment_id)
            .map(|r| r.id.clone());
        match restaurant_id {
            Some(id) => Ok(Some(self.locks.for_aggregate(&id)?)),
            None => Ok(None),
        }
    }

    // ===== Reviews =====

    /// List visible reviews (open read)
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the store lock is poisoned.
    pub fn list_reviews(&self, caller: &Caller, from: usize) -> Result<Vec<ReviewView>> {
        authorize(caller, Action::ListReviews, None)?;
        Ok(moderation_queries::list_reviews(&*self.read()?, from))
    }

    /// Submit the caller's review against an open comment
    ///
    /// Serialized per comment so two concurrent submissions cannot both
    /// pass the Open-state check.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for plain-user callers; propagates workflow
    /// state errors and `PartialApplication` from the core op.
    pub fn submit_review(
        &self,
        caller: &Caller,
        comment_id: &str,
        description: String,
    ) -> Result<ReviewView> {
        authorize(caller, Action::CreateReview, Some(&caller.user_id))?;
        let aggregate = self.locks.for_aggregate(comment_id)?;
        let _serial = aggregate.lock().map_err(|_| lock_poisoned("aggregate"))?;
        let mut store = self.write()?;
        let ctx = RequestContext::new();
        let id = review_ops::submit_review(&mut store, comment_id, &caller.user_id, description)?;
        info!(
            op = "submit_review",
            request_id = %ctx.request_id,
            review_id = %id,
            comment_id,
            "review submitted"
        );
        self.review_view(&store, &id)
    }

    /// Update a review's description (admin moderation)
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admin callers; propagates validation and
    /// `ReviewNotFound` errors.
    pub fn update_review(
        &self,
        caller: &Caller,
        id: &str,
        description: Option<String>,
    ) -> Result<ReviewView> {
        authorize(caller, Action::UpdateReview, None)?;
        let mut store = self.write()?;
        review_ops::update_review(&mut store, id, description)?;
        self.review_view(&store, id)
    }

    /// Retract a review, reopening its comment (admin)
    ///
    /// Returns the id of the reopened comment.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admin callers; propagates
    /// `ReviewNotFound` and `ReviewDetached` from the core op.
    pub fn retract_review(&self, caller: &Caller, review_id: &str) -> Result<String> {
        authorize(caller, Action::RetractReview, None)?;
        let comment_id = self
            .read()?
            .find_comment_by_review(review_id)
            .map(|c| c.id.clone());
        let handle = match comment_id {
            Some(id) => Some(self.locks.for_aggregate(&id)?),
            None => None,
        };
        let _serial = lock_handle(&handle)?;
        let mut store = self.write()?;
        let ctx = RequestContext::new();
        let reopened = review_ops::retract_review(&mut store, review_id)?;
        info!(
            op = "retract_review",
            request_id = %ctx.request_id,
            review_id,
            comment_id = %reopened,
            "review retracted"
        );
        Ok(reopened)
    }

    fn review_view(&self, store: &Store, id: &str) -> Result<ReviewView> {
        let review = store.get_review(id)?;
        prune_review(expand_review(store, review)).ok_or_else(|| CoreError::ReviewNotFound {
            review_id: id.to_string(),
        })
    }
}

type AggregateHandle = std::sync::Arc<std::sync::Mutex<()>>;

fn lock_handle(handle: &Option<AggregateHandle>) -> Result<Option<std::sync::MutexGuard<'_, ()>>> {
    match handle {
        Some(mutex) => mutex
            .lock()
            .map(Some)
            .map_err(|_| lock_poisoned("aggregate")),
        None => Ok(None),
    }
}
