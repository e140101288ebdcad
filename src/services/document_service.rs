//! Certificate and appreciation letter service
//!
//! Documents are produced when a review round closes. Rendering is CPU bound
//! and runs on the blocking pool; the PDF goes to the documents store and a
//! row keyed by (submission, kind, recipient email) records it, so generating
//! again replaces the earlier copy and keeps its verification code.

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    authorization,
    db::repositories::{DocumentRepository, NewDocument, UserRepository},
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    models::{
        verification_code, Document, DocumentKind, Role, Submission, SubmissionKind,
        SubmissionStatus,
    },
    pdf::{CertificateContent, LetterContent, PdfRenderer},
    services::SubmissionService,
    state::AppState,
    storage::FileStore,
    utils::{format_long_date, now_utc},
};

/// Who receives a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub user_id: Option<Uuid>,
    pub name: String,
    pub email: String,
}

/// Document service
pub struct DocumentService;

impl DocumentService {
    /// Generate documents in the background; failures are logged only
    pub fn spawn_generation(state: AppState, submission: Submission) {
        tokio::spawn(async move {
            let submission_id = submission.id;
            match Self::generate(state.db(), state.documents(), state.renderer(), &submission).await {
                Ok(docs) => {
                    tracing::info!(submission_id = %submission_id, documents = docs.len(), "Documents generated")
                }
                Err(e) => {
                    tracing::warn!(submission_id = %submission_id, error = %e, "Document generation failed")
                }
            }
        });
    }

    /// Generate every document a decided submission is owed
    pub async fn generate(
        pool: &PgPool,
        store: &dyn FileStore,
        renderer: &PdfRenderer,
        submission: &Submission,
    ) -> AppResult<Vec<Document>> {
        if !submission.status.is_decided() {
            return Ok(Vec::new());
        }

        let issued_on = format_long_date(now_utc());
        let mut documents = Vec::new();

        if submission.status == SubmissionStatus::Approved {
            let owner = UserRepository::find_by_id(pool, &submission.author_id).await?;
            for recipient in certificate_recipients(submission, owner.as_ref().map(|u| u.email.as_str())) {
                let code = verification_code(&submission.id, DocumentKind::Certificate, &recipient.email);
                let content = CertificateContent {
                    recipient_name: recipient.name.clone(),
                    submission_title: submission.title.clone(),
                    submission_kind: kind_label(submission.kind).to_string(),
                    verification_code: code.clone(),
                    issued_on: issued_on.clone(),
                };
                let renderer = renderer.clone();
                let bytes = render_blocking(move || renderer.render_certificate(&content)).await?;

                documents.push(
                    Self::store(pool, store, DocumentKind::Certificate, submission, &recipient, &code, &bytes)
                        .await?,
                );
            }
        }

        let reviewer_ids: Vec<Uuid> = submission
            .review
            .reviews
            .iter()
            .map(|r| r.reviewer)
            .filter(|id| submission.is_assigned(id))
            .collect();
        for user in UserRepository::find_many(pool, &reviewer_ids).await? {
            let recipient = Recipient {
                user_id: Some(user.id),
                name: user.name,
                email: user.email,
            };
            let code = verification_code(&submission.id, DocumentKind::Letter, &recipient.email);
            let content = LetterContent {
                recipient_name: recipient.name.clone(),
                submission_title: submission.title.clone(),
                verification_code: code.clone(),
                issued_on: issued_on.clone(),
            };
            let renderer = renderer.clone();
            let bytes = render_blocking(move || renderer.render_letter(&content)).await?;

            documents.push(
                Self::store(pool, store, DocumentKind::Letter, submission, &recipient, &code, &bytes).await?,
            );
        }

        Ok(documents)
    }

    /// Regenerate the documents of a decided submission (admin)
    pub async fn regenerate(state: &AppState, submission_id: &Uuid) -> AppResult<Vec<Document>> {
        let submission = SubmissionService::find(state.db(), submission_id).await?;
        if !submission.status.is_decided() {
            return Err(AppError::InvalidTransition(format!(
                "Documents are only issued for decided submissions (currently {})",
                submission.status
            )));
        }

        let documents =
            Self::generate(state.db(), state.documents(), state.renderer(), &submission).await?;
        tracing::info!(submission_id = %submission.id, documents = documents.len(), "Documents regenerated");
        Ok(documents)
    }

    /// Documents of one kind visible to the caller
    pub async fn list(
        pool: &PgPool,
        requester: &AuthenticatedUser,
        kind: DocumentKind,
    ) -> AppResult<Vec<Document>> {
        match (requester.role, kind) {
            (Role::Admin, _) => DocumentRepository::list(pool, kind, None, None).await,
            (Role::Student, DocumentKind::Certificate) => {
                DocumentRepository::list(pool, kind, Some(&requester.id), None).await
            }
            (Role::Reviewer, DocumentKind::Letter) => {
                DocumentRepository::list(pool, kind, None, Some(&requester.id)).await
            }
            _ => Err(AppError::Forbidden(format!(
                "Role '{}' cannot list {} documents",
                requester.role, kind
            ))),
        }
    }

    /// Load a document and its PDF bytes for an allowed caller
    pub async fn download(
        pool: &PgPool,
        store: &dyn FileStore,
        requester: &AuthenticatedUser,
        id: &Uuid,
    ) -> AppResult<(Document, Vec<u8>)> {
        let document = DocumentRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;
        let submission = SubmissionService::find(pool, &document.submission_id).await?;

        if !authorization::can_download_document(requester, &document, &submission) {
            return Err(AppError::Forbidden("Cannot access this document".to_string()));
        }

        let bytes = store.get(&document.file_name).await?;
        Ok((document, bytes))
    }

    /// Look a document up by its printed verification code
    pub async fn verify(pool: &PgPool, code: &str) -> AppResult<(Document, Submission)> {
        let code = code.trim().to_uppercase();
        let document = DocumentRepository::find_by_code(pool, &code)
            .await?
            .ok_or_else(|| AppError::NotFound("No document carries this verification code".to_string()))?;
        let submission = SubmissionService::find(pool, &document.submission_id).await?;
        Ok((document, submission))
    }

    async fn store(
        pool: &PgPool,
        store: &dyn FileStore,
        kind: DocumentKind,
        submission: &Submission,
        recipient: &Recipient,
        code: &str,
        bytes: &[u8],
    ) -> AppResult<Document> {
        let stored = store.put_named(&document_file_name(kind, code), bytes).await?;

        DocumentRepository::upsert(
            pool,
            &NewDocument {
                kind,
                submission_id: submission.id,
                recipient_id: recipient.user_id,
                recipient_name: &recipient.name,
                recipient_email: &recipient.email,
                verification_code: code,
                file_name: &stored.name,
            },
        )
        .await
    }
}

/// One certificate per listed author. The author whose email matches the
/// owner's account is linked to it.
pub fn certificate_recipients(submission: &Submission, owner_email: Option<&str>) -> Vec<Recipient> {
    submission
        .authors
        .iter()
        .map(|a| Recipient {
            user_id: owner_email
                .filter(|e| e.eq_ignore_ascii_case(&a.email))
                .map(|_| submission.author_id),
            name: a.name.clone(),
            email: a.email.to_lowercase(),
        })
        .collect()
}

/// Stored file name of a generated document
pub fn document_file_name(kind: DocumentKind, code: &str) -> String {
    format!("{}_{}.pdf", kind.as_str(), code)
}

fn kind_label(kind: SubmissionKind) -> &'static str {
    match kind {
        SubmissionKind::ResearchPaper => "research paper",
        SubmissionKind::Project => "project",
    }
}

async fn render_blocking<F>(render: F) -> AppResult<Vec<u8>>
where
    F: FnOnce() -> AppResult<Vec<u8>> + Send + 'static,
{
    tokio::task::spawn_blocking(render)
        .await
        .map_err(|e| AppError::Rendering(format!("Render task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Author, ReviewRecord};
    use chrono::Utc;

    fn approved(authors: Vec<Author>) -> Submission {
        Submission {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            kind: SubmissionKind::Project,
            title: "Compiler".to_string(),
            authors,
            file_url: "/api/v1/files/c.pdf".to_string(),
            status: SubmissionStatus::Approved,
            reviewers: Vec::new(),
            review: ReviewRecord::default(),
            revision: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_certificate_per_author_links_owner() {
        let s = approved(vec![
            Author {
                name: "Ada".to_string(),
                email: "Ada@Example.com".to_string(),
            },
            Author {
                name: "Bob".to_string(),
                email: "bob@example.com".to_string(),
            },
        ]);

        let recipients = certificate_recipients(&s, Some("ada@example.com"));
        assert_eq!(recipients.len(), 2);
        assert_eq!(recipients[0].user_id, Some(s.author_id));
        assert_eq!(recipients[0].email, "ada@example.com");
        assert_eq!(recipients[1].user_id, None);
    }

    #[test]
    fn test_document_file_name_is_storable() {
        let name = document_file_name(DocumentKind::Letter, "ABCDEF0123456789");
        assert_eq!(name, "letter_ABCDEF0123456789.pdf");
        assert!(crate::utils::validation::validate_stored_file_name(&name).is_ok());
    }

    #[tokio::test]
    async fn test_render_task_error_is_propagated() {
        let result = render_blocking(|| Err(AppError::Rendering("no fonts".to_string()))).await;
        assert!(matches!(result, Err(AppError::Rendering(_))));
    }
}
