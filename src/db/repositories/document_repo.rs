//! Generated document repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Document, DocumentKind, DocumentRow},
};

/// New document record
#[derive(Debug)]
pub struct NewDocument<'a> {
    pub kind: DocumentKind,
    pub submission_id: Uuid,
    pub recipient_id: Option<Uuid>,
    pub recipient_name: &'a str,
    pub recipient_email: &'a str,
    pub verification_code: &'a str,
    pub file_name: &'a str,
}

/// Repository for generated documents
pub struct DocumentRepository;

impl DocumentRepository {
    /// Insert a document, replacing an earlier one for the same recipient
    pub async fn upsert(pool: &PgPool, doc: &NewDocument<'_>) -> AppResult<Document> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            INSERT INTO documents (
                kind, submission_id, recipient_id, recipient_name,
                recipient_email, verification_code, file_name
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (submission_id, kind, recipient_email) DO UPDATE
            SET recipient_id = EXCLUDED.recipient_id,
                recipient_name = EXCLUDED.recipient_name,
                file_name = EXCLUDED.file_name,
                created_at = NOW()
            RETURNING *
            "#,
        )
        .bind(doc.kind.as_str())
        .bind(doc.submission_id)
        .bind(doc.recipient_id)
        .bind(doc.recipient_name)
        .bind(doc.recipient_email)
        .bind(doc.verification_code)
        .bind(doc.file_name)
        .fetch_one(pool)
        .await?;

        row.try_into()
    }

    /// Find document by ID
    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<Document>> {
        sqlx::query_as::<_, DocumentRow>(r#"SELECT * FROM documents WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .map(Document::try_from)
            .transpose()
    }

    /// Find document by verification code
    pub async fn find_by_code(pool: &PgPool, code: &str) -> AppResult<Option<Document>> {
        sqlx::query_as::<_, DocumentRow>(r#"SELECT * FROM documents WHERE verification_code = $1"#)
            .bind(code)
            .fetch_optional(pool)
            .await?
            .map(Document::try_from)
            .transpose()
    }

    /// All documents generated for one submission
    pub async fn list_for_submission(pool: &PgPool, submission_id: &Uuid) -> AppResult<Vec<Document>> {
        sqlx::query_as::<_, DocumentRow>(
            r#"SELECT * FROM documents WHERE submission_id = $1 ORDER BY created_at"#,
        )
        .bind(submission_id)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(Document::try_from)
        .collect()
    }

    /// List documents of one kind.
    ///
    /// `owner_id` restricts certificates to submissions owned by that user;
    /// `recipient_id` restricts to documents addressed to that user.
    pub async fn list(
        pool: &PgPool,
        kind: DocumentKind,
        owner_id: Option<&Uuid>,
        recipient_id: Option<&Uuid>,
    ) -> AppResult<Vec<Document>> {
        sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT d.* FROM documents d
            JOIN submissions s ON s.id = d.submission_id
            WHERE d.kind = $1
                AND ($2::uuid IS NULL OR s.author_id = $2)
                AND ($3::uuid IS NULL OR d.recipient_id = $3)
            ORDER BY d.created_at DESC
            "#,
        )
        .bind(kind.as_str())
        .bind(owner_id)
        .bind(recipient_id)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(Document::try_from)
        .collect()
    }
}
