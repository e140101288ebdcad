//! Dashboard service

use std::collections::BTreeMap;

use sqlx::PgPool;

use crate::{
    db::repositories::{SubmissionRepository, UserRepository},
    error::AppResult,
    handlers::dashboard::response::DashboardResponse,
    middleware::auth::AuthenticatedUser,
    models::{Role, Submission, SubmissionStatus},
};

/// Dashboard service
pub struct DashboardService;

impl DashboardService {
    /// Build the dashboard for the caller's role
    pub async fn for_user(pool: &PgPool, user: &AuthenticatedUser) -> AppResult<DashboardResponse> {
        match user.role {
            Role::Student => {
                let rows = SubmissionRepository::count_by_status(pool, Some(&user.id)).await?;
                let (submissions, total_submissions) = status_counts(rows);
                Ok(DashboardResponse::Student {
                    submissions,
                    total_submissions,
                })
            }
            Role::Reviewer => {
                let assigned = SubmissionRepository::find_assigned(pool, &user.id).await?;
                let (pending, reviewed) = reviewer_counts(&assigned, user);
                Ok(DashboardResponse::Reviewer {
                    assigned: assigned.len(),
                    pending,
                    reviewed,
                })
            }
            Role::Admin => {
                let (submissions, total_submissions) =
                    status_counts(SubmissionRepository::count_by_status(pool, None).await?);
                let (users, total_users) = role_counts(UserRepository::count_by_role(pool).await?);
                Ok(DashboardResponse::Admin {
                    submissions,
                    total_submissions,
                    users,
                    total_users,
                })
            }
        }
    }
}

/// Counts per status, with every status present
fn status_counts(rows: Vec<(String, i64)>) -> (BTreeMap<String, i64>, i64) {
    let mut counts: BTreeMap<String, i64> = SubmissionStatus::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), 0))
        .collect();
    let mut total = 0;
    for (status, count) in rows {
        total += count;
        *counts.entry(status).or_insert(0) += count;
    }
    (counts, total)
}

/// Counts per role, with every role present
fn role_counts(rows: Vec<(String, i64)>) -> (BTreeMap<String, i64>, i64) {
    let mut counts: BTreeMap<String, i64> =
        Role::ALL.iter().map(|r| (r.as_str().to_string(), 0)).collect();
    let mut total = 0;
    for (role, count) in rows {
        total += count;
        *counts.entry(role).or_insert(0) += count;
    }
    (counts, total)
}

/// (awaiting this reviewer, already reviewed by them in the current round)
fn reviewer_counts(assigned: &[Submission], reviewer: &AuthenticatedUser) -> (usize, usize) {
    let pending = assigned
        .iter()
        .filter(|s| s.status == SubmissionStatus::InReview && !s.review.has_reviewed(&reviewer.id))
        .count();
    let reviewed = assigned
        .iter()
        .filter(|s| s.review.has_reviewed(&reviewer.id))
        .count();
    (pending, reviewed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReviewDecision, SubmissionKind};
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_status_counts_fill_missing() {
        let (counts, total) = status_counts(vec![
            ("submitted".to_string(), 3),
            ("approved".to_string(), 2),
        ]);
        assert_eq!(total, 5);
        assert_eq!(counts.len(), 5);
        assert_eq!(counts["in_review"], 0);
        assert_eq!(counts["submitted"], 3);
    }

    #[test]
    fn test_role_counts() {
        let (counts, total) = role_counts(vec![("student".to_string(), 10)]);
        assert_eq!(total, 10);
        assert_eq!(counts["admin"], 0);
        assert_eq!(counts["student"], 10);
    }

    #[test]
    fn test_reviewer_counts() {
        let me = AuthenticatedUser {
            id: Uuid::new_v4(),
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            role: Role::Reviewer,
            is_active: true,
        };
        let make = || Submission {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            kind: SubmissionKind::ResearchPaper,
            title: "T".to_string(),
            authors: Vec::new(),
            file_url: "/f".to_string(),
            status: SubmissionStatus::Submitted,
            reviewers: vec![me.id, Uuid::new_v4()],
            review: Default::default(),
            revision: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let mut waiting = make();
        waiting.status = SubmissionStatus::InReview;
        let mut done = make();
        done.status = SubmissionStatus::InReview;
        done.record_review(me.id, ReviewDecision::Approved, "ok".to_string(), Utc::now())
            .unwrap();

        assert_eq!(reviewer_counts(&[waiting, done], &me), (1, 1));
    }
}
