//! Review request DTOs

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::constants::MAX_COMMENT_LENGTH;

/// Replace the assigned reviewers
#[derive(Debug, Deserialize, Validate)]
pub struct AssignReviewersRequest {
    #[validate(length(min = 1))]
    pub reviewer_ids: Vec<Uuid>,
}

/// Submit a review for the current round
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitReviewRequest {
    /// approved, needs_revision or rejected
    pub decision: String,

    #[validate(length(min = 1, max = MAX_COMMENT_LENGTH))]
    pub comment: String,
}
