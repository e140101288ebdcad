//! Submission service

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    authorization,
    constants::FILES_URL_PREFIX,
    db::repositories::{DocumentRepository, SubmissionFilter, SubmissionRepository},
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    models::{normalize_authors, Author, DeadlineKind, Role, Submission, SubmissionEdit, SubmissionKind},
    services::DeadlineService,
    storage::FileStore,
    utils::{now_utc, page_offset, validation},
};

/// A new submission as received from its author
#[derive(Debug)]
pub struct NewSubmission {
    pub kind: SubmissionKind,
    pub title: String,
    pub authors: Vec<Author>,
    pub file_url: String,
}

/// A resubmission after a `needs_revision` outcome
#[derive(Debug)]
pub struct Resubmission {
    pub file_url: String,
    pub title: Option<String>,
    pub authors: Option<Vec<Author>>,
}

/// Submission service for business logic
pub struct SubmissionService;

impl SubmissionService {
    /// Create a new submission
    pub async fn create(
        pool: &PgPool,
        requester: &AuthenticatedUser,
        new: NewSubmission,
    ) -> AppResult<Submission> {
        DeadlineService::ensure_open(pool, DeadlineKind::Submission, now_utc()).await?;

        let title =
            validation::validate_title(&new.title).map_err(|e| AppError::Validation(e.to_string()))?;
        validation::validate_file_url(&new.file_url)
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let authors = normalize_authors(new.authors);
        new.kind.validate_authors(&authors)?;

        let submission = SubmissionRepository::create(
            pool,
            &requester.id,
            new.kind,
            &title,
            &authors,
            new.file_url.trim(),
        )
        .await?;

        tracing::info!(
            submission_id = %submission.id,
            author_id = %requester.id,
            kind = %submission.kind,
            "Submission created"
        );
        Ok(submission)
    }

    /// Load a submission the caller is allowed to see
    pub async fn get(
        pool: &PgPool,
        requester: &AuthenticatedUser,
        id: &Uuid,
    ) -> AppResult<Submission> {
        let submission = Self::find(pool, id).await?;
        authorization::require_view_submission(requester, &submission)?;
        Ok(submission)
    }

    /// List submissions visible to the caller
    pub async fn list(
        pool: &PgPool,
        requester: &AuthenticatedUser,
        page: u32,
        per_page: u32,
        mut filter: SubmissionFilter,
    ) -> AppResult<(Vec<Submission>, i64)> {
        match requester.role {
            Role::Student => {
                filter.author_id = Some(requester.id);
                filter.reviewer_id = None;
            }
            Role::Reviewer => {
                filter.author_id = None;
                filter.reviewer_id = Some(requester.id);
            }
            Role::Admin => {}
        }

        let offset = page_offset(page, per_page);
        let limit = per_page as i64;

        SubmissionRepository::list(pool, offset, limit, filter).await
    }

    /// Owner edit while still `submitted`
    pub async fn update(
        pool: &PgPool,
        requester: &AuthenticatedUser,
        id: &Uuid,
        edit: SubmissionEdit,
    ) -> AppResult<Submission> {
        let mut submission = Self::find(pool, id).await?;
        authorization::require_owner(requester, &submission)?;

        submission.apply_edit(edit)?;
        let submission = SubmissionRepository::save(pool, &submission).await?;

        tracing::info!(submission_id = %submission.id, "Submission updated");
        Ok(submission)
    }

    /// Delete a submission: the owner while `submitted`, or an admin at any time
    pub async fn delete(
        pool: &PgPool,
        uploads: &dyn FileStore,
        documents: &dyn FileStore,
        requester: &AuthenticatedUser,
        id: &Uuid,
    ) -> AppResult<()> {
        let submission = Self::find(pool, id).await?;

        if !requester.is_admin() {
            authorization::require_owner(requester, &submission)?;
            if !submission.status.is_editable() {
                return Err(AppError::InvalidTransition(format!(
                    "Submission can only be deleted while submitted (currently {})",
                    submission.status
                )));
            }
        }

        let generated = DocumentRepository::list_for_submission(pool, id).await?;
        if !SubmissionRepository::delete(pool, id).await? {
            return Err(AppError::NotFound("Submission not found".to_string()));
        }

        remove_files(uploads, local_file_name(&submission.file_url), id).await;
        let generated_names: Vec<&str> = generated.iter().map(|d| d.file_name.as_str()).collect();
        remove_files(documents, generated_names, id).await;

        tracing::info!(submission_id = %id, by = %requester.id, "Submission deleted");
        Ok(())
    }

    /// Start a new review round after `needs_revision`
    pub async fn resubmit(
        pool: &PgPool,
        requester: &AuthenticatedUser,
        id: &Uuid,
        resubmission: Resubmission,
    ) -> AppResult<Submission> {
        let mut submission = Self::find(pool, id).await?;
        authorization::require_owner(requester, &submission)?;
        submission.ensure_resubmittable()?;
        DeadlineService::ensure_open(pool, DeadlineKind::Resubmission, now_utc()).await?;

        submission.resubmit(
            resubmission.file_url,
            resubmission.title,
            resubmission.authors,
        )?;
        let submission = SubmissionRepository::save(pool, &submission).await?;

        tracing::info!(
            submission_id = %submission.id,
            revision = submission.revision,
            status = %submission.status,
            "Submission resubmitted"
        );
        Ok(submission)
    }

    pub(crate) async fn find(pool: &PgPool, id: &Uuid) -> AppResult<Submission> {
        SubmissionRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))
    }
}

/// Remove stored files best-effort; failures are logged and skipped
async fn remove_files<'a>(
    store: &dyn FileStore,
    names: impl IntoIterator<Item = &'a str>,
    submission_id: &Uuid,
) {
    for name in names {
        if let Err(e) = store.delete(name).await {
            tracing::warn!(submission_id = %submission_id, file = %name, error = %e, "Failed to remove stored file");
        }
    }
}

/// Stored name of a manuscript uploaded through this server, if it is one
fn local_file_name(file_url: &str) -> Option<&str> {
    file_url
        .strip_prefix(FILES_URL_PREFIX)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalFileStore;

    #[test]
    fn test_local_file_name() {
        assert_eq!(
            local_file_name("/api/v1/files/abc_paper.pdf"),
            Some("abc_paper.pdf")
        );
        assert_eq!(local_file_name("/api/v1/files/"), None);
        assert_eq!(local_file_name("https://drive.example.com/paper.pdf"), None);
    }

    #[tokio::test]
    async fn test_remove_files_clears_generated_documents() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path(), "/api/v1/documents").await.unwrap();
        let cert = store.put_named("certificate_AAAA.pdf", b"%PDF-1.4").await.unwrap();
        let letter = store.put_named("letter_BBBB.pdf", b"%PDF-1.4").await.unwrap();
        let kept = store.put_named("letter_CCCC.pdf", b"%PDF-1.4").await.unwrap();

        // a bad name is skipped without stopping the rest
        let names = ["../escape.pdf", cert.name.as_str(), letter.name.as_str()];
        remove_files(&store, names, &Uuid::new_v4()).await;

        assert!(store.get(&cert.name).await.is_err());
        assert!(store.get(&letter.name).await.is_err());
        tokio_test::assert_ok!(store.get(&kept.name).await);
    }
}
