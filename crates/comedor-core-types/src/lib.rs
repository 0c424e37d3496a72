//! Core types shared across Comedor facilities
//!
//! This crate provides foundational types used by every other crate:
//!
//! - **Correlation types**: RequestId, TraceId, RequestContext
//! - **Identity types**: Role, Caller

pub mod correlation;
pub mod role;

pub use correlation::{RequestContext, RequestId, TraceId};
pub use role::{Caller, Role};
