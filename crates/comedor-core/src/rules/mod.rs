//! Validation and invariant enforcement
//!
//! `validation` holds the per-field checks the mutation ops share;
//! `invariants` is a full-store sweep asserting the cross-entity
//! consistency rules, intended for tests and reconciliation tooling.

pub mod invariants;
pub mod validation;
