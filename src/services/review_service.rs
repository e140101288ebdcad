//! Review workflow service
//!
//! Assignment, review intake, and the majority tally that closes a round.
//! Closing a round hands the submission to [`DocumentService`] for
//! certificates and letters; see the handlers for how that is scheduled.
//!
//! [`DocumentService`]: crate::services::DocumentService

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    authorization,
    db::repositories::{SubmissionRepository, UserRepository},
    error::{AppError, AppResult},
    handlers::reviews::response::{
        AssignedReviewer, AssignmentResponse, FeedbackEntry, FeedbackResponse,
        ReviewSubmittedResponse,
    },
    middleware::auth::AuthenticatedUser,
    models::{ReviewDecision, Role, Submission, SubmissionStatus},
    services::SubmissionService,
    utils::{now_utc, validation},
};

/// Review workflow service
pub struct ReviewService;

impl ReviewService {
    /// Replace the reviewer list of a submission.
    ///
    /// Returns the saved submission together with the final decision when the
    /// new assignment completes the round.
    pub async fn assign_reviewers(
        pool: &PgPool,
        requester: &AuthenticatedUser,
        submission_id: &Uuid,
        reviewer_ids: Vec<Uuid>,
    ) -> AppResult<(Submission, AssignmentResponse, Option<ReviewDecision>)> {
        let mut submission = SubmissionService::find(pool, submission_id).await?;

        let reviewers = UserRepository::find_many(pool, &reviewer_ids).await?;
        let by_id: HashMap<Uuid, _> = reviewers.into_iter().map(|u| (u.id, u)).collect();
        for id in &reviewer_ids {
            match by_id.get(id) {
                None => return Err(AppError::NotFound(format!("Reviewer {} not found", id))),
                Some(user) if !user.can_review() => {
                    return Err(AppError::Validation(format!(
                        "User {} is not an active reviewer",
                        id
                    )));
                }
                Some(_) => {}
            }
        }

        let decision = submission.assign_reviewers(reviewer_ids)?;
        let submission = SubmissionRepository::save(pool, &submission).await?;

        tracing::info!(
            submission_id = %submission.id,
            reviewers = submission.reviewers.len(),
            by = %requester.id,
            "Reviewers assigned"
        );
        if let Some(decision) = decision {
            tracing::info!(submission_id = %submission.id, decision = %decision, "Review round closed");
        }

        let response = AssignmentResponse {
            submission_id: submission.id,
            status: submission.status,
            reviewers: submission
                .reviewers
                .iter()
                .filter_map(|id| by_id.get(id))
                .map(|u| AssignedReviewer {
                    id: u.id,
                    name: u.name.clone(),
                    email: u.email.clone(),
                    has_reviewed: submission.review.has_reviewed(&u.id),
                })
                .collect(),
            final_decision: submission.review.final_decision,
        };

        Ok((submission, response, decision))
    }

    /// Record the caller's review for the current round
    pub async fn submit_review(
        pool: &PgPool,
        requester: &AuthenticatedUser,
        submission_id: &Uuid,
        decision: ReviewDecision,
        comment: &str,
    ) -> AppResult<(Submission, ReviewSubmittedResponse, Option<ReviewDecision>)> {
        let comment = validation::sanitize_string(comment);
        if comment.is_empty() {
            return Err(AppError::Validation("Comment cannot be empty".to_string()));
        }

        let mut submission = SubmissionService::find(pool, submission_id).await?;
        let outcome = submission.record_review(requester.id, decision, comment, now_utc())?;
        let submission = SubmissionRepository::save(pool, &submission).await?;

        tracing::info!(
            submission_id = %submission.id,
            reviewer_id = %requester.id,
            decision = %decision,
            "Review submitted"
        );
        if let Some(outcome) = outcome {
            tracing::info!(submission_id = %submission.id, decision = %outcome, "Review round closed");
        }

        let response = ReviewSubmittedResponse {
            submission_id: submission.id,
            status: submission.status,
            reviews_received: submission.review.reviews.len(),
            reviewers_assigned: submission.reviewers.len(),
            final_decision: submission.review.final_decision,
        };

        Ok((submission, response, outcome))
    }

    /// Feedback of a submission as the caller may see it
    pub async fn feedback(
        pool: &PgPool,
        requester: &AuthenticatedUser,
        submission_id: &Uuid,
    ) -> AppResult<FeedbackResponse> {
        let submission = SubmissionService::find(pool, submission_id).await?;
        authorization::require_view_submission(requester, &submission)?;

        let names: HashMap<Uuid, String> = if requester.role == Role::Student {
            HashMap::new()
        } else {
            UserRepository::find_many(pool, &submission.reviewers)
                .await?
                .into_iter()
                .map(|u| (u.id, u.name))
                .collect()
        };

        Ok(feedback_view(requester, &submission, &names))
    }
}

/// Build the feedback view for one viewer.
///
/// Students never see who wrote a review. While a round is open a reviewer
/// only sees their own review.
pub fn feedback_view(
    viewer: &AuthenticatedUser,
    submission: &Submission,
    names: &HashMap<Uuid, String>,
) -> FeedbackResponse {
    let blind = viewer.role == Role::Student;
    let round_open = submission.status == SubmissionStatus::InReview;

    let reviews = submission
        .review
        .reviews
        .iter()
        .filter(|r| viewer.role != Role::Reviewer || !round_open || r.reviewer == viewer.id)
        .map(|r| FeedbackEntry {
            reviewer_id: (!blind).then_some(r.reviewer),
            reviewer_name: if blind { None } else { names.get(&r.reviewer).cloned() },
            decision: r.decision,
            comment: r.comment.clone(),
            submitted_at: r.submitted_at,
        })
        .collect();

    FeedbackResponse {
        submission_id: submission.id,
        status: submission.status,
        revision: submission.revision,
        final_decision: submission.review.final_decision,
        reviews,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Author, ReviewEntry, ReviewRecord, SubmissionKind};
    use chrono::Utc;

    fn caller(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            name: "Caller".to_string(),
            email: "caller@example.com".to_string(),
            role,
            is_active: true,
        }
    }

    fn reviewed(owner: Uuid, reviewers: &[Uuid], status: SubmissionStatus) -> Submission {
        Submission {
            id: Uuid::new_v4(),
            author_id: owner,
            kind: SubmissionKind::ResearchPaper,
            title: "On Graphs".to_string(),
            authors: vec![Author {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            }],
            file_url: "/api/v1/files/a.pdf".to_string(),
            status,
            reviewers: reviewers.to_vec(),
            review: ReviewRecord {
                reviews: reviewers
                    .iter()
                    .map(|id| ReviewEntry {
                        reviewer: *id,
                        decision: ReviewDecision::Approved,
                        comment: format!("comment by {}", id),
                        submitted_at: Utc::now(),
                    })
                    .collect(),
                final_decision: None,
            },
            revision: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_sees_blind_feedback() {
        let owner = caller(Role::Student);
        let r1 = Uuid::new_v4();
        let names = HashMap::from([(r1, "Grace".to_string())]);
        let s = reviewed(owner.id, &[r1], SubmissionStatus::Approved);

        let view = feedback_view(&owner, &s, &names);
        assert_eq!(view.reviews.len(), 1);
        assert!(view.reviews[0].reviewer_id.is_none());
        assert!(view.reviews[0].reviewer_name.is_none());

        let json = serde_json::to_value(&view).unwrap();
        assert!(json["reviews"][0].get("reviewer_id").is_none());
    }

    #[test]
    fn test_admin_sees_reviewer_identities() {
        let r1 = Uuid::new_v4();
        let names = HashMap::from([(r1, "Grace".to_string())]);
        let s = reviewed(Uuid::new_v4(), &[r1], SubmissionStatus::Approved);

        let view = feedback_view(&caller(Role::Admin), &s, &names);
        assert_eq!(view.reviews[0].reviewer_id, Some(r1));
        assert_eq!(view.reviews[0].reviewer_name.as_deref(), Some("Grace"));
    }

    #[test]
    fn test_reviewer_sees_only_own_review_while_open() {
        let me = caller(Role::Reviewer);
        let other = Uuid::new_v4();
        let open = reviewed(Uuid::new_v4(), &[me.id, other], SubmissionStatus::InReview);

        let view = feedback_view(&me, &open, &HashMap::new());
        assert_eq!(view.reviews.len(), 1);
        assert_eq!(view.reviews[0].reviewer_id, Some(me.id));

        let mut closed = open.clone();
        closed.status = SubmissionStatus::Approved;
        assert_eq!(feedback_view(&me, &closed, &HashMap::new()).reviews.len(), 2);
    }
}
