//! Submission model and lifecycle state machine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

use crate::{
    constants::{MAX_PROJECT_AUTHORS, RESEARCH_PAPER_AUTHORS},
    error::{AppError, AppResult},
    models::review::{ReviewDecision, ReviewEntry, ReviewRecord},
    utils::validation,
};

/// Kind of submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionKind {
    ResearchPaper,
    Project,
}

impl SubmissionKind {
    /// Get kind as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResearchPaper => "research_paper",
            Self::Project => "project",
        }
    }

    /// Parse kind from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "research_paper" => Some(Self::ResearchPaper),
            "project" => Some(Self::Project),
            _ => None,
        }
    }

    /// Inclusive bounds on the number of authors
    pub fn author_bounds(&self) -> (usize, usize) {
        match self {
            Self::ResearchPaper => (RESEARCH_PAPER_AUTHORS, RESEARCH_PAPER_AUTHORS),
            Self::Project => (1, MAX_PROJECT_AUTHORS),
        }
    }

    /// Check the author list against this kind's rules
    pub fn validate_authors(&self, authors: &[Author]) -> AppResult<()> {
        let (min, max) = self.author_bounds();
        if authors.len() < min || authors.len() > max {
            let expected = if min == max {
                format!("exactly {}", min)
            } else {
                format!("{} to {}", min, max)
            };
            return Err(AppError::Validation(format!(
                "A {} must have {} author(s), got {}",
                self.as_str(),
                expected,
                authors.len()
            )));
        }

        for (i, author) in authors.iter().enumerate() {
            if author.name.trim().is_empty() {
                return Err(AppError::Validation(format!("Author #{} has no name", i + 1)));
            }
            validation::validate_email(&author.email).map_err(|e| {
                AppError::Validation(format!("Author #{}: {}", i + 1, e))
            })?;
        }

        let mut emails: Vec<String> = authors.iter().map(|a| a.email.to_lowercase()).collect();
        emails.sort();
        emails.dedup();
        if emails.len() != authors.len() {
            return Err(AppError::Validation("Author emails must be unique".to_string()));
        }

        Ok(())
    }
}

impl std::fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Submission status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Submitted,
    InReview,
    Approved,
    NeedsRevision,
    Rejected,
}

impl SubmissionStatus {
    /// All statuses, in lifecycle order
    pub const ALL: [SubmissionStatus; 5] = [
        SubmissionStatus::Submitted,
        SubmissionStatus::InReview,
        SubmissionStatus::Approved,
        SubmissionStatus::NeedsRevision,
        SubmissionStatus::Rejected,
    ];

    /// Get status as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::InReview => "in_review",
            Self::Approved => "approved",
            Self::NeedsRevision => "needs_revision",
            Self::Rejected => "rejected",
        }
    }

    /// Parse status from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "submitted" => Some(Self::Submitted),
            "in_review" => Some(Self::InReview),
            "approved" => Some(Self::Approved),
            "needs_revision" => Some(Self::NeedsRevision),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Check whether the lifecycle allows moving to `next`
    pub fn can_transition_to(&self, next: SubmissionStatus) -> bool {
        use SubmissionStatus::*;

        matches!(
            (self, next),
            (Submitted, InReview)
                | (InReview, InReview)
                | (InReview, Approved)
                | (InReview, NeedsRevision)
                | (InReview, Rejected)
                | (NeedsRevision, InReview)
                | (NeedsRevision, Submitted)
        )
    }

    /// Move to `next`, or fail with a transition error
    pub fn transition(self, next: SubmissionStatus) -> AppResult<SubmissionStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AppError::InvalidTransition(format!("{} -> {}", self, next)))
        }
    }

    /// Author edits are only accepted before review starts
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Submitted)
    }

    /// Reviewers have reached a decision
    pub fn is_decided(&self) -> bool {
        matches!(self, Self::Approved | Self::NeedsRevision | Self::Rejected)
    }
}

impl From<ReviewDecision> for SubmissionStatus {
    fn from(decision: ReviewDecision) -> Self {
        match decision {
            ReviewDecision::Approved => Self::Approved,
            ReviewDecision::NeedsRevision => Self::NeedsRevision,
            ReviewDecision::Rejected => Self::Rejected,
        }
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Named author of a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub email: String,
}

/// Sanitize author names and lowercase their emails
pub fn normalize_authors(authors: Vec<Author>) -> Vec<Author> {
    authors
        .into_iter()
        .map(|a| Author {
            name: validation::sanitize_string(&a.name),
            email: a.email.trim().to_lowercase(),
        })
        .collect()
}

/// Submission database row
#[derive(Debug, Clone, FromRow)]
pub struct SubmissionRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub kind: String,
    pub title: String,
    pub authors: Json<Vec<Author>>,
    pub file_url: String,
    pub status: String,
    pub reviewers: Vec<Uuid>,
    pub review: Json<ReviewRecord>,
    pub revision: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Submission domain model
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub id: Uuid,
    pub author_id: Uuid,
    pub kind: SubmissionKind,
    pub title: String,
    pub authors: Vec<Author>,
    pub file_url: String,
    pub status: SubmissionStatus,
    pub reviewers: Vec<Uuid>,
    pub review: ReviewRecord,
    pub revision: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<SubmissionRow> for Submission {
    type Error = AppError;

    fn try_from(row: SubmissionRow) -> Result<Self, Self::Error> {
        let kind = SubmissionKind::from_str(&row.kind).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("Unknown kind '{}' on submission {}", row.kind, row.id))
        })?;
        let status = SubmissionStatus::from_str(&row.status).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "Unknown status '{}' on submission {}",
                row.status,
                row.id
            ))
        })?;

        Ok(Self {
            id: row.id,
            author_id: row.author_id,
            kind,
            title: row.title,
            authors: row.authors.0,
            file_url: row.file_url,
            status,
            reviewers: row.reviewers,
            review: row.review.0,
            revision: row.revision,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Fields an owner may change while the submission is still editable
#[derive(Debug, Default)]
pub struct SubmissionEdit {
    pub kind: Option<SubmissionKind>,
    pub title: Option<String>,
    pub authors: Option<Vec<Author>>,
    pub file_url: Option<String>,
}

impl Submission {
    /// Whether `user_id` owns this submission
    pub fn is_owner(&self, user_id: &Uuid) -> bool {
        &self.author_id == user_id
    }

    /// Whether `user_id` is an assigned reviewer
    pub fn is_assigned(&self, user_id: &Uuid) -> bool {
        self.reviewers.contains(user_id)
    }

    /// Apply an owner edit. Only allowed while `submitted`.
    pub fn apply_edit(&mut self, edit: SubmissionEdit) -> AppResult<()> {
        if !self.status.is_editable() {
            return Err(AppError::InvalidTransition(format!(
                "Submission can only be edited while submitted (currently {})",
                self.status
            )));
        }

        let kind = edit.kind.unwrap_or(self.kind);
        let authors = match edit.authors {
            Some(authors) => normalize_authors(authors),
            None => self.authors.clone(),
        };
        kind.validate_authors(&authors)?;

        let title = edit
            .title
            .map(|t| validation::validate_title(&t))
            .transpose()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if let Some(file_url) = &edit.file_url {
            validation::validate_file_url(file_url)
                .map_err(|e| AppError::Validation(e.to_string()))?;
        }

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(file_url) = edit.file_url {
            self.file_url = file_url.trim().to_string();
        }
        self.kind = kind;
        self.authors = authors;

        Ok(())
    }

    /// Replace the reviewer list.
    ///
    /// Moves the submission to `in_review`. Reviews by reviewers who are no
    /// longer assigned are discarded, and the round is tallied if the
    /// remaining reviewers have all responded.
    pub fn assign_reviewers(&mut self, reviewers: Vec<Uuid>) -> AppResult<Option<ReviewDecision>> {
        let mut unique: Vec<Uuid> = Vec::with_capacity(reviewers.len());
        for id in reviewers {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }

        if unique.is_empty() {
            return Err(AppError::Validation("At least one reviewer is required".to_string()));
        }
        if unique.contains(&self.author_id) {
            return Err(AppError::Validation(
                "The submitting author cannot review their own submission".to_string(),
            ));
        }

        self.status = self.status.transition(SubmissionStatus::InReview)?;
        self.reviewers = unique;
        self.review.retain_assigned(&self.reviewers);
        self.review.final_decision = None;

        Ok(self.finalize_if_complete())
    }

    /// Record a reviewer's decision for the current round
    pub fn record_review(
        &mut self,
        reviewer: Uuid,
        decision: ReviewDecision,
        comment: String,
        at: DateTime<Utc>,
    ) -> AppResult<Option<ReviewDecision>> {
        if !self.is_assigned(&reviewer) {
            return Err(AppError::Forbidden(
                "Not assigned to review this submission".to_string(),
            ));
        }
        if self.status != SubmissionStatus::InReview {
            return Err(AppError::InvalidTransition(format!(
                "Reviews are only accepted while in review (currently {})",
                self.status
            )));
        }
        if self.review.has_reviewed(&reviewer) {
            return Err(AppError::Conflict(
                "Review already submitted for this round".to_string(),
            ));
        }

        self.review.reviews.push(ReviewEntry {
            reviewer,
            decision,
            comment,
            submitted_at: at,
        });

        Ok(self.finalize_if_complete())
    }

    /// Start a new round from `needs_revision`
    pub fn resubmit(
        &mut self,
        file_url: String,
        title: Option<String>,
        authors: Option<Vec<Author>>,
    ) -> AppResult<()> {
        self.ensure_resubmittable()?;
        let next = if self.reviewers.is_empty() {
            SubmissionStatus::Submitted
        } else {
            SubmissionStatus::InReview
        };

        validation::validate_file_url(&file_url).map_err(|e| AppError::Validation(e.to_string()))?;
        let authors = match authors {
            Some(authors) => normalize_authors(authors),
            None => self.authors.clone(),
        };
        self.kind.validate_authors(&authors)?;
        let title = title
            .map(|t| validation::validate_title(&t))
            .transpose()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.status = self.status.transition(next)?;
        if let Some(title) = title {
            self.title = title;
        }
        self.file_url = file_url.trim().to_string();
        self.authors = authors;
        self.review.reset();
        self.revision += 1;

        Ok(())
    }

    /// Fail unless the submission is waiting for a revision
    pub fn ensure_resubmittable(&self) -> AppResult<()> {
        if self.status != SubmissionStatus::NeedsRevision {
            return Err(AppError::InvalidTransition(format!(
                "Resubmission is only allowed from needs_revision (currently {})",
                self.status
            )));
        }
        Ok(())
    }

    fn finalize_if_complete(&mut self) -> Option<ReviewDecision> {
        if !self.review.is_complete(&self.reviewers) {
            return None;
        }

        let decision = self.review.tally(&self.reviewers)?;
        self.review.final_decision = Some(decision);
        self.status = decision.into();
        Some(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReviewDecision::*;

    fn author(name: &str) -> Author {
        Author {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
        }
    }

    fn submission(kind: SubmissionKind) -> Submission {
        Submission {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            kind,
            title: "On Graphs".to_string(),
            authors: vec![author("Ada")],
            file_url: "/api/v1/files/a.pdf".to_string(),
            status: SubmissionStatus::Submitted,
            reviewers: Vec::new(),
            review: ReviewRecord::default(),
            revision: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_author_rules() {
        let paper = SubmissionKind::ResearchPaper;
        assert!(paper.validate_authors(&[author("Ada")]).is_ok());
        assert!(paper.validate_authors(&[]).is_err());
        assert!(paper.validate_authors(&[author("Ada"), author("Bob")]).is_err());

        let project = SubmissionKind::Project;
        assert!(project.validate_authors(&[author("Ada")]).is_ok());
        assert!(project
            .validate_authors(&[author("Ada"), author("Bob"), author("Cy")])
            .is_ok());
        assert!(project
            .validate_authors(&[author("Ada"), author("Bob"), author("Cy"), author("Di")])
            .is_err());
        assert!(project.validate_authors(&[author("Ada"), author("Ada")]).is_err());

        let bad_email = Author {
            name: "Eve".to_string(),
            email: "eve".to_string(),
        };
        assert!(project.validate_authors(&[bad_email]).is_err());
    }

    #[test]
    fn test_transition_table() {
        use SubmissionStatus::*;

        assert!(Submitted.can_transition_to(InReview));
        assert!(InReview.can_transition_to(Approved));
        assert!(NeedsRevision.can_transition_to(InReview));
        assert!(!Submitted.can_transition_to(Approved));
        assert!(!NeedsRevision.can_transition_to(Approved));
        for next in SubmissionStatus::ALL {
            assert!(!Approved.can_transition_to(next));
            assert!(!Rejected.can_transition_to(next));
        }
        assert!(matches!(
            Approved.transition(InReview),
            Err(AppError::InvalidTransition(_))
        ));
    }

    #[test]
    fn test_edit_only_while_submitted() {
        let mut s = submission(SubmissionKind::Project);
        s.apply_edit(SubmissionEdit {
            authors: Some(vec![author("Ada"), author("Bob")]),
            title: Some("  New Title ".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(s.title, "New Title");
        assert_eq!(s.authors.len(), 2);

        // switching to research paper with two authors breaks the author rule
        let err = s
            .apply_edit(SubmissionEdit {
                kind: Some(SubmissionKind::ResearchPaper),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        s.status = SubmissionStatus::InReview;
        let err = s.apply_edit(SubmissionEdit::default()).unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
    }

    #[test]
    fn test_assign_reviewers_moves_to_in_review() {
        let mut s = submission(SubmissionKind::ResearchPaper);
        let r1 = Uuid::new_v4();
        let r2 = Uuid::new_v4();

        let decided = s.assign_reviewers(vec![r1, r2, r1]).unwrap();
        assert_eq!(decided, None);
        assert_eq!(s.status, SubmissionStatus::InReview);
        assert_eq!(s.reviewers, vec![r1, r2]);
    }

    #[test]
    fn test_assign_reviewers_rejects_owner_and_empty() {
        let mut s = submission(SubmissionKind::ResearchPaper);
        assert!(s.assign_reviewers(vec![]).is_err());
        let owner = s.author_id;
        assert!(s.assign_reviewers(vec![owner]).is_err());
        assert_eq!(s.status, SubmissionStatus::Submitted);
    }

    #[test]
    fn test_review_round_reaches_majority() {
        let mut s = submission(SubmissionKind::ResearchPaper);
        let (r1, r2, r3) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        s.assign_reviewers(vec![r1, r2, r3]).unwrap();

        assert_eq!(s.record_review(r1, Approved, "good".into(), Utc::now()).unwrap(), None);
        assert_eq!(s.record_review(r2, Rejected, "weak".into(), Utc::now()).unwrap(), None);
        assert_eq!(
            s.record_review(r3, Approved, "fine".into(), Utc::now()).unwrap(),
            Some(Approved)
        );
        assert_eq!(s.status, SubmissionStatus::Approved);
        assert_eq!(s.review.final_decision, Some(Approved));
    }

    #[test]
    fn test_review_requires_assignment_and_is_single_per_round() {
        let mut s = submission(SubmissionKind::ResearchPaper);
        let (r1, r2) = (Uuid::new_v4(), Uuid::new_v4());

        // not yet in review
        s.reviewers = vec![r1];
        assert!(matches!(
            s.record_review(r1, Approved, "x".into(), Utc::now()),
            Err(AppError::InvalidTransition(_))
        ));

        s.assign_reviewers(vec![r1, r2]).unwrap();
        let stranger = Uuid::new_v4();
        assert!(matches!(
            s.record_review(stranger, Approved, "x".into(), Utc::now()),
            Err(AppError::Forbidden(_))
        ));

        s.record_review(r1, Approved, "x".into(), Utc::now()).unwrap();
        assert!(matches!(
            s.record_review(r1, Rejected, "y".into(), Utc::now()),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn test_reassignment_drops_reviews_and_can_finalize() {
        let mut s = submission(SubmissionKind::ResearchPaper);
        let (r1, r2) = (Uuid::new_v4(), Uuid::new_v4());
        s.assign_reviewers(vec![r1, r2]).unwrap();
        s.record_review(r1, Rejected, "no".into(), Utc::now()).unwrap();

        // r2 never answers; admin keeps only r1, whose review completes the round
        let decided = s.assign_reviewers(vec![r1]).unwrap();
        assert_eq!(decided, Some(Rejected));
        assert_eq!(s.status, SubmissionStatus::Rejected);

        // rejected is terminal
        assert!(s.assign_reviewers(vec![r2]).is_err());
    }

    #[test]
    fn test_resubmit_from_needs_revision_only() {
        let mut s = submission(SubmissionKind::ResearchPaper);
        assert!(matches!(
            s.resubmit("/api/v1/files/b.pdf".into(), None, None),
            Err(AppError::InvalidTransition(_))
        ));

        let r1 = Uuid::new_v4();
        s.assign_reviewers(vec![r1]).unwrap();
        s.record_review(r1, NeedsRevision, "fix section 2".into(), Utc::now())
            .unwrap();
        assert_eq!(s.status, SubmissionStatus::NeedsRevision);

        s.resubmit("/api/v1/files/b.pdf".into(), Some("On Graphs, Revised".into()), None)
            .unwrap();
        assert_eq!(s.status, SubmissionStatus::InReview);
        assert_eq!(s.revision, 1);
        assert!(s.review.reviews.is_empty());
        assert_eq!(s.review.final_decision, None);
        assert_eq!(s.reviewers, vec![r1]);
        assert_eq!(s.title, "On Graphs, Revised");
    }

    #[test]
    fn test_resubmit_rechecks_author_rule_and_keeps_state_on_failure() {
        let mut s = submission(SubmissionKind::ResearchPaper);
        let r1 = Uuid::new_v4();
        s.assign_reviewers(vec![r1]).unwrap();
        s.record_review(r1, NeedsRevision, "fix".into(), Utc::now()).unwrap();

        let err = s
            .resubmit(
                "/api/v1/files/b.pdf".into(),
                Some("Changed".into()),
                Some(vec![author("Ada"), author("Bob")]),
            )
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(s.status, SubmissionStatus::NeedsRevision);
        assert_eq!(s.revision, 0);
        assert_eq!(s.title, "On Graphs");
        assert_eq!(s.file_url, "/api/v1/files/a.pdf");
        assert_eq!(s.review.final_decision, Some(NeedsRevision));
    }

    #[test]
    fn test_resubmit_without_reviewers_returns_to_submitted() {
        let mut s = submission(SubmissionKind::Project);
        s.status = SubmissionStatus::NeedsRevision;

        s.resubmit("/api/v1/files/c.pdf".into(), None, None).unwrap();
        assert_eq!(s.status, SubmissionStatus::Submitted);
        assert_eq!(s.revision, 1);
        assert_eq!(s.file_url, "/api/v1/files/c.pdf");
    }

    #[test]
    fn test_ensure_resubmittable_only_from_needs_revision() {
        let mut s = submission(SubmissionKind::Project);
        for status in SubmissionStatus::ALL {
            s.status = status;
            let result = s.ensure_resubmittable();
            if status == SubmissionStatus::NeedsRevision {
                assert!(result.is_ok());
            } else {
                assert!(matches!(result, Err(AppError::InvalidTransition(_))));
            }
        }
    }

    #[test]
    fn test_edit_and_resubmit_normalize_authors() {
        let raw = vec![Author {
            name: "  Ada\u{7} Lovelace ".to_string(),
            email: " Ada@Example.COM ".to_string(),
        }];
        let expected = normalize_authors(raw.clone());
        assert_eq!(expected[0].email, "ada@example.com");

        let mut s = submission(SubmissionKind::ResearchPaper);
        s.apply_edit(SubmissionEdit {
            authors: Some(raw.clone()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(s.authors, expected);

        s.status = SubmissionStatus::NeedsRevision;
        s.authors = vec![author("Bob")];
        s.resubmit("/api/v1/files/b.pdf".into(), None, Some(raw)).unwrap();
        assert_eq!(s.authors, expected);
    }

    #[test]
    fn test_assign_many_reviewers() {
        let mut s = submission(SubmissionKind::ResearchPaper);
        let reviewers: Vec<Uuid> = (0..8).map(|_| Uuid::new_v4()).collect();
        assert_eq!(s.assign_reviewers(reviewers.clone()).unwrap(), None);
        assert_eq!(s.reviewers, reviewers);
    }
}
