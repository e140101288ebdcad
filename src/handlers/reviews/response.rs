//! Review response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{ReviewDecision, SubmissionStatus};

/// Assigned reviewer
#[derive(Debug, Serialize)]
pub struct AssignedReviewer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub has_reviewed: bool,
}

/// Result of a reviewer assignment
#[derive(Debug, Serialize)]
pub struct AssignmentResponse {
    pub submission_id: Uuid,
    pub status: SubmissionStatus,
    pub reviewers: Vec<AssignedReviewer>,
    pub final_decision: Option<ReviewDecision>,
}

/// Result of submitting a review
#[derive(Debug, Serialize)]
pub struct ReviewSubmittedResponse {
    pub submission_id: Uuid,
    pub status: SubmissionStatus,
    pub reviews_received: usize,
    pub reviewers_assigned: usize,
    pub final_decision: Option<ReviewDecision>,
}

/// One review as shown to the viewer
#[derive(Debug, Serialize)]
pub struct FeedbackEntry {
    /// Hidden from the submitting author
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_name: Option<String>,
    pub decision: ReviewDecision,
    pub comment: String,
    pub submitted_at: DateTime<Utc>,
}

/// Review feedback of a submission
#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub submission_id: Uuid,
    pub status: SubmissionStatus,
    pub revision: i32,
    pub final_decision: Option<ReviewDecision>,
    pub reviews: Vec<FeedbackEntry>,
}
