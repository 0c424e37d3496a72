//! Read-only query surfaces over the store
//!
//! Every query goes through the visibility filter: expand then prune. List
//! surfaces take a `from` offset (skip-style pagination) and return views
//! in creation order.

pub mod moderation_queries;
pub mod restaurant_queries;
