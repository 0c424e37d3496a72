use thiserror::Error;

/// Result type alias using CoreError
pub type Result<T> = std::result::Result<T, CoreError>;

/// Stable error kind taxonomy
///
/// Every `CoreError` variant projects onto one of these kinds. The excluded
/// HTTP layer maps kinds to status codes via the stable `code()` strings;
/// the granular variants below exist for diagnosis, the kinds for contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Referenced entity absent or invisible (tombstoned)
    NotFound,
    /// Missing or malformed required field
    Validation,
    /// Workflow transition not legal from the current state
    InvalidState,
    /// A second visible comment by the same user on the same restaurant
    DuplicateComment,
    /// Access policy denial
    Forbidden,
    /// Transient store failure, retryable by the caller
    StoreUnavailable,
    /// Multi-step workflow committed its first write but not its second
    PartialApplication,
}

impl ErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "ERR_NOT_FOUND",
            ErrorKind::Validation => "ERR_VALIDATION",
            ErrorKind::InvalidState => "ERR_INVALID_STATE",
            ErrorKind::DuplicateComment => "ERR_DUPLICATE_COMMENT",
            ErrorKind::Forbidden => "ERR_FORBIDDEN",
            ErrorKind::StoreUnavailable => "ERR_STORE_UNAVAILABLE",
            ErrorKind::PartialApplication => "ERR_PARTIAL_APPLICATION",
        }
    }
}

/// Comprehensive error taxonomy for Comedor core operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    // ===== Lookup Errors =====
    /// User not found or not visible
    #[error("User not found: {user_id}")]
    UserNotFound { user_id: String },

    /// Restaurant not found or not visible
    #[error("Restaurant not found: {restaurant_id}")]
    RestaurantNotFound { restaurant_id: String },

    /// Comment not found or not visible
    #[error("Comment not found: {comment_id}")]
    CommentNotFound { comment_id: String },

    /// Review not found or not visible
    #[error("Review not found: {review_id}")]
    ReviewNotFound { review_id: String },

    // ===== Validation Errors =====
    /// Required field is missing, empty, or whitespace-only
    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    /// Rate outside the 0-5 range
    #[error("Invalid rate {rate}: must be between 0 and 5")]
    InvalidRate { rate: u8 },

    /// Email already registered (deleted accounts keep their address)
    #[error("Email already registered: {email}")]
    EmailTaken { email: String },

    /// Restaurant owner must hold the Owner or Admin role
    #[error("User {user_id} cannot own a restaurant: role is {role}")]
    OwnerRoleRequired { user_id: String, role: String },

    // ===== Workflow Errors =====
    /// Comment already holds a review (state REVIEWED)
    #[error("Comment already reviewed: {comment_id}")]
    CommentAlreadyReviewed { comment_id: String },

    /// Comment is tombstoned and cannot accept workflow transitions
    #[error("Comment {comment_id} is not visible")]
    CommentNotVisible { comment_id: String },

    /// Comment is open, so there is no review to retract
    #[error("Comment {comment_id} is open: nothing to retract")]
    CommentNotReviewed { comment_id: String },

    /// Review is not referenced by any visible comment
    #[error("Review {review_id} is not attached to any visible comment")]
    ReviewDetached { review_id: String },

    /// A visible comment by this user already exists on this restaurant
    #[error("User {user_id} already commented on restaurant {restaurant_id}")]
    DuplicateComment {
        restaurant_id: String,
        user_id: String,
    },

    // ===== Policy Errors =====
    /// Access policy denied the operation
    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    // ===== Integrity Errors =====
    /// Comment `opened`/`review` fields disagree (invariant breach)
    #[error("Comment {comment_id} workflow state is inconsistent: opened={opened}, has_review={has_review}")]
    WorkflowStateInconsistent {
        comment_id: String,
        opened: bool,
        has_review: bool,
    },

    /// Stored normal_rate disagrees with the visible comment set
    #[error("Restaurant {restaurant_id} rating is stale: stored {stored}, computed {computed}")]
    StaleRating {
        restaurant_id: String,
        stored: u8,
        computed: u8,
    },

    /// Restaurant references a comment id that does not exist in storage
    #[error("Restaurant {restaurant_id} references unknown comment: {comment_id}")]
    DanglingCommentRef {
        restaurant_id: String,
        comment_id: String,
    },

    /// Review exists but its comment write was never applied
    #[error("Review {review_id} was created but its comment was not updated")]
    OrphanedReview { review_id: String },

    // ===== Infrastructure Errors =====
    /// Store or lock temporarily unavailable; the caller may retry
    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    /// Review committed but the follow-up comment write failed
    #[error("Partial application: review {review_id} committed, comment update failed: {message}")]
    PartialApplication { review_id: String, message: String },

    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl CoreError {
    /// Project this error onto the stable kind taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::UserNotFound { .. }
            | CoreError::RestaurantNotFound { .. }
            | CoreError::CommentNotFound { .. }
            | CoreError::ReviewNotFound { .. } => ErrorKind::NotFound,

            CoreError::InvalidField { .. }
            | CoreError::InvalidRate { .. }
            | CoreError::EmailTaken { .. }
            | CoreError::OwnerRoleRequired { .. } => ErrorKind::Validation,

            CoreError::CommentAlreadyReviewed { .. }
            | CoreError::CommentNotVisible { .. }
            | CoreError::CommentNotReviewed { .. }
            | CoreError::ReviewDetached { .. }
            | CoreError::WorkflowStateInconsistent { .. }
            | CoreError::StaleRating { .. }
            | CoreError::DanglingCommentRef { .. }
            | CoreError::OrphanedReview { .. } => ErrorKind::InvalidState,

            CoreError::DuplicateComment { .. } => ErrorKind::DuplicateComment,

            CoreError::Forbidden { .. } => ErrorKind::Forbidden,

            CoreError::StoreUnavailable { .. } | CoreError::Serialization { .. } => {
                ErrorKind::StoreUnavailable
            }

            CoreError::PartialApplication { .. } => ErrorKind::PartialApplication,
        }
    }

    /// Get the stable error code for this error
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}

/// Conversion from serde_json::Error to CoreError
impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization {
            message: err.to_string(),
        }
    }
}
