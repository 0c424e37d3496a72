//! Domain models for the Comedor platform
//!
//! Four entities, all soft-deletable via the `status` tombstone flag:
//! User, Restaurant, Comment and Review. Cross-references are identifier
//! fields; there is no foreign-key enforcement from the storage layer, so
//! the consistency rules live in `ops`, `rating` and `rules`.

mod comment;
mod restaurant;
mod review;
mod user;

pub use comment::{Comment, WorkflowState};
pub use restaurant::Restaurant;
pub use review::Review;
pub use user::User;
