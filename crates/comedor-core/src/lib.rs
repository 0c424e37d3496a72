//! Comedor Core - Moderation & Consistency Engine
//!
//! This crate provides the domain kernel of the restaurant-review platform,
//! including:
//! - User, Restaurant, Comment and Review models with soft-delete semantics
//! - The in-memory entity store (explicit handle, no global state)
//! - The visibility filter (expand + prune over entity graphs)
//! - The rating aggregator (derived `normal_rate` recomputation)
//! - The comment ⇄ review moderation workflow
//! - The role-based access policy
//! - Store-wide invariant checking
//!
//! HTTP routing, credential handling, file upload and process bootstrap are
//! external collaborators; this crate consumes already-authenticated
//! operation requests and returns typed results.

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod policy;
pub mod queries;
pub mod rating;
pub mod rules;
pub mod visibility;

// Re-export commonly used types
pub use errors::{CoreError, ErrorKind, Result};
pub use model::{Comment, Restaurant, Review, User, WorkflowState};
pub use ops::Store;
pub use policy::{authorize, Action};
pub use visibility::{CommentView, RestaurantView, ReviewView, UserView};
