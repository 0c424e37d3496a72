//! Logging facility
//!
//! Structured logging over `tracing`. Call sites emit plain `tracing`
//! events with field captures; this module only owns subscriber setup.

pub mod init;

pub use init::{init, Profile};
