//! Per-aggregate lock registry
//!
//! Serializes the multi-entity write sequences: two concurrent comment
//! creations on one restaurant must not interleave their duplicate check
//! and rating recompute, and two review submissions against one comment
//! must not both pass the Open-state check. The registry hands out one
//! mutex per aggregate key (restaurant id for comment writes, comment id
//! for the review workflow); keys never expire, which is fine for the
//! in-memory store this engine fronts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use comedor_core::{CoreError, Result};

#[derive(Debug, Default)]
pub(crate) struct AggregateLocks {
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl AggregateLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Get (or create) the lock for an aggregate key
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the registry mutex is poisoned.
    pub(crate) fn for_aggregate(&self, key: &str) -> Result<Arc<Mutex<()>>> {
        let mut map = self.inner.lock().map_err(|_| CoreError::StoreUnavailable {
            message: "aggregate lock registry poisoned".to_string(),
        })?;
        Ok(Arc::clone(map.entry(key.to_string()).or_default()))
    }
}
