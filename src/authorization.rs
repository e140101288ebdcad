//! Role allow-lists and resource-level access checks.
//!
//! Every handler checks its allow-list first; the resource checks below then
//! narrow access to owners and assigned reviewers.

use crate::{
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    models::{Document, DocumentKind, Role, Submission},
};

/// Role allow-lists per operation
pub mod allow {
    use crate::models::Role;

    pub const CREATE_SUBMISSION: &[Role] = &[Role::Student];
    pub const EDIT_SUBMISSION: &[Role] = &[Role::Student];
    pub const RESUBMIT: &[Role] = &[Role::Student];
    pub const DELETE_SUBMISSION: &[Role] = &[Role::Student, Role::Admin];
    pub const VIEW_SUBMISSION: &[Role] = &[Role::Student, Role::Reviewer, Role::Admin];

    pub const ASSIGN_REVIEWERS: &[Role] = &[Role::Admin];
    pub const SUBMIT_REVIEW: &[Role] = &[Role::Reviewer];
    pub const VIEW_FEEDBACK: &[Role] = &[Role::Student, Role::Reviewer, Role::Admin];

    pub const MANAGE_USERS: &[Role] = &[Role::Admin];
    pub const MANAGE_DEADLINES: &[Role] = &[Role::Admin];

    pub const LIST_CERTIFICATES: &[Role] = &[Role::Student, Role::Admin];
    pub const LIST_LETTERS: &[Role] = &[Role::Reviewer, Role::Admin];
    pub const GENERATE_DOCUMENTS: &[Role] = &[Role::Admin];
}

/// Caller may read the submission: owner, assigned reviewer, or admin
pub fn can_view_submission(user: &AuthenticatedUser, submission: &Submission) -> bool {
    match user.role {
        Role::Admin => true,
        Role::Reviewer => submission.is_assigned(&user.id),
        Role::Student => submission.is_owner(&user.id),
    }
}

/// Fail unless the caller may read the submission
pub fn require_view_submission(user: &AuthenticatedUser, submission: &Submission) -> AppResult<()> {
    if can_view_submission(user, submission) {
        Ok(())
    } else {
        Err(AppError::Forbidden("Cannot access this submission".to_string()))
    }
}

/// Fail unless the caller owns the submission
pub fn require_owner(user: &AuthenticatedUser, submission: &Submission) -> AppResult<()> {
    if submission.is_owner(&user.id) {
        Ok(())
    } else {
        Err(AppError::Forbidden("Only the submitting author may do this".to_string()))
    }
}

/// Caller may download a generated document
pub fn can_download_document(
    user: &AuthenticatedUser,
    document: &Document,
    submission: &Submission,
) -> bool {
    match (user.role, document.kind) {
        (Role::Admin, _) => true,
        (Role::Student, DocumentKind::Certificate) => submission.is_owner(&user.id),
        (Role::Reviewer, DocumentKind::Letter) => document.recipient_id == Some(user.id),
        _ => false,
    }
}

/// Fail unless the caller may act on another user's account
pub fn require_self_or_admin(user: &AuthenticatedUser, target: &uuid::Uuid) -> AppResult<()> {
    if user.is_admin() || &user.id == target {
        Ok(())
    } else {
        Err(AppError::Forbidden("Cannot access other users' accounts".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Author, ReviewRecord, SubmissionKind, SubmissionStatus};
    use chrono::Utc;
    use uuid::Uuid;

    fn caller(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            name: "Caller".to_string(),
            email: "caller@example.com".to_string(),
            role,
            is_active: true,
        }
    }

    fn submission(owner: Uuid, reviewers: Vec<Uuid>) -> Submission {
        Submission {
            id: Uuid::new_v4(),
            author_id: owner,
            kind: SubmissionKind::ResearchPaper,
            title: "T".to_string(),
            authors: vec![Author {
                name: "A".to_string(),
                email: "a@example.com".to_string(),
            }],
            file_url: "/f".to_string(),
            status: SubmissionStatus::InReview,
            reviewers,
            review: ReviewRecord::default(),
            revision: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn document(kind: DocumentKind, recipient: Option<Uuid>, submission_id: Uuid) -> Document {
        Document {
            id: Uuid::new_v4(),
            kind,
            submission_id,
            recipient_id: recipient,
            recipient_name: "R".to_string(),
            recipient_email: "r@example.com".to_string(),
            verification_code: "X".to_string(),
            file_name: "x.pdf".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_submission_visibility() {
        let owner = caller(Role::Student);
        let assigned = caller(Role::Reviewer);
        let other_reviewer = caller(Role::Reviewer);
        let other_student = caller(Role::Student);
        let admin = caller(Role::Admin);
        let s = submission(owner.id, vec![assigned.id]);

        assert!(can_view_submission(&owner, &s));
        assert!(can_view_submission(&assigned, &s));
        assert!(can_view_submission(&admin, &s));
        assert!(!can_view_submission(&other_reviewer, &s));
        assert!(!can_view_submission(&other_student, &s));
    }

    #[test]
    fn test_owner_check() {
        let owner = caller(Role::Student);
        let admin = caller(Role::Admin);
        let s = submission(owner.id, vec![]);

        assert!(require_owner(&owner, &s).is_ok());
        assert!(require_owner(&admin, &s).is_err());
    }

    #[test]
    fn test_document_download_rules() {
        let owner = caller(Role::Student);
        let reviewer = caller(Role::Reviewer);
        let s = submission(owner.id, vec![reviewer.id]);

        let cert = document(DocumentKind::Certificate, Some(owner.id), s.id);
        let letter = document(DocumentKind::Letter, Some(reviewer.id), s.id);

        assert!(can_download_document(&owner, &cert, &s));
        assert!(!can_download_document(&owner, &letter, &s));
        assert!(can_download_document(&reviewer, &letter, &s));
        assert!(!can_download_document(&reviewer, &cert, &s));
        assert!(can_download_document(&caller(Role::Admin), &letter, &s));
    }

    #[test]
    fn test_allow_lists() {
        assert!(allow::ASSIGN_REVIEWERS == [Role::Admin]);
        assert!(!allow::SUBMIT_REVIEW.contains(&Role::Admin));
        assert!(!allow::CREATE_SUBMISSION.contains(&Role::Reviewer));
    }
}
