use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Workflow state of a comment, derived from `opened` and `review`
///
/// `Open`: awaiting an owner review (`opened = true`, no review reference).
/// `Reviewed`: answered (`opened = false`, review reference set).
/// Any other combination of the two fields is an invariant breach and has
/// no state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Open,
    Reviewed,
}

/// Comment - a rated remark a user leaves on a restaurant
///
/// Created by a User (or Admin) against exactly one restaurant; the
/// restaurant holds the back-reference. At most one visible comment per
/// (restaurant, user) pair. The `opened`/`review` pair is owned by the
/// moderation workflow: no other code path writes those fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier (UUID v7)
    pub id: String,

    /// Rating, 0-5
    pub rate: u8,

    /// Short title
    pub title: String,

    /// Free-form body
    pub description: String,

    /// Authoring user id (never a holder of the Owner role)
    pub user: String,

    /// Review reference - set iff the comment is closed
    pub review: Option<String>,

    /// True while the comment awaits an owner review
    pub opened: bool,

    /// Tombstone flag
    pub status: bool,

    /// Timestamp when this comment was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when this comment was last updated
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Create a new visible comment in the `Open` state
    pub fn new(id: String, rate: u8, title: String, description: String, user: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            rate,
            title,
            description,
            user,
            review: None,
            opened: true,
            status: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if this comment is visible (not soft-deleted)
    pub fn is_visible(&self) -> bool {
        self.status
    }

    /// Derive the workflow state, or None if `opened`/`review` disagree
    pub fn workflow_state(&self) -> Option<WorkflowState> {
        match (self.opened, &self.review) {
            (true, None) => Some(WorkflowState::Open),
            (false, Some(_)) => Some(WorkflowState::Reviewed),
            _ => None,
        }
    }
}
