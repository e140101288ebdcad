//! Submission response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    middleware::auth::AuthenticatedUser,
    models::{Author, ReviewDecision, Role, Submission, SubmissionKind, SubmissionStatus},
};

/// Submission as returned to its viewers
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub id: Uuid,
    pub author_id: Uuid,
    pub kind: SubmissionKind,
    pub title: String,
    pub authors: Vec<Author>,
    pub file_url: String,
    pub status: SubmissionStatus,
    pub revision: i32,
    /// Reviewer identities are withheld from students
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewers: Option<Vec<Uuid>>,
    pub reviewer_count: usize,
    pub reviews_received: usize,
    pub final_decision: Option<ReviewDecision>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubmissionResponse {
    pub fn for_viewer(submission: Submission, viewer: &AuthenticatedUser) -> Self {
        let reviewers = (viewer.role != Role::Student).then(|| submission.reviewers.clone());

        Self {
            id: submission.id,
            author_id: submission.author_id,
            kind: submission.kind,
            title: submission.title,
            authors: submission.authors,
            file_url: submission.file_url,
            status: submission.status,
            revision: submission.revision,
            reviewers,
            reviewer_count: submission.reviewers.len(),
            reviews_received: submission.review.reviews.len(),
            final_decision: submission.review.final_decision,
            created_at: submission.created_at,
            updated_at: submission.updated_at,
        }
    }
}

/// Submission list response
#[derive(Debug, Serialize)]
pub struct SubmissionsListResponse {
    pub submissions: Vec<SubmissionResponse>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}
