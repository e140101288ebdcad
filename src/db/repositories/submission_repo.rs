//! Submission repository

use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Author, Submission, SubmissionKind, SubmissionRow, SubmissionStatus},
};

/// Filters for listing submissions
#[derive(Debug, Default, Clone, Copy)]
pub struct SubmissionFilter {
    /// Only submissions owned by this user
    pub author_id: Option<Uuid>,
    /// Only submissions assigned to this reviewer
    pub reviewer_id: Option<Uuid>,
    pub status: Option<SubmissionStatus>,
    pub kind: Option<SubmissionKind>,
}

/// Repository for submission database operations
pub struct SubmissionRepository;

impl SubmissionRepository {
    /// Create a new submission
    pub async fn create(
        pool: &PgPool,
        author_id: &Uuid,
        kind: SubmissionKind,
        title: &str,
        authors: &[Author],
        file_url: &str,
    ) -> AppResult<Submission> {
        let row = sqlx::query_as::<_, SubmissionRow>(
            r#"
            INSERT INTO submissions (author_id, kind, title, authors, file_url, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(author_id)
        .bind(kind.as_str())
        .bind(title)
        .bind(Json(authors))
        .bind(file_url)
        .bind(SubmissionStatus::Submitted.as_str())
        .fetch_one(pool)
        .await?;

        row.try_into()
    }

    /// Find submission by ID
    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<Submission>> {
        sqlx::query_as::<_, SubmissionRow>(r#"SELECT * FROM submissions WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .map(Submission::try_from)
            .transpose()
    }

    /// Write back every mutable field of a submission.
    ///
    /// This is a plain overwrite of the whole record; concurrent writers race
    /// and the last one wins.
    pub async fn save(pool: &PgPool, submission: &Submission) -> AppResult<Submission> {
        let row = sqlx::query_as::<_, SubmissionRow>(
            r#"
            UPDATE submissions
            SET
                kind = $2,
                title = $3,
                authors = $4,
                file_url = $5,
                status = $6,
                reviewers = $7,
                review = $8,
                revision = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(submission.id)
        .bind(submission.kind.as_str())
        .bind(&submission.title)
        .bind(Json(&submission.authors))
        .bind(&submission.file_url)
        .bind(submission.status.as_str())
        .bind(&submission.reviewers)
        .bind(Json(&submission.review))
        .bind(submission.revision)
        .fetch_one(pool)
        .await?;

        row.try_into()
    }

    /// Delete a submission
    pub async fn delete(pool: &PgPool, id: &Uuid) -> AppResult<bool> {
        let result = sqlx::query(r#"DELETE FROM submissions WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List submissions with filters and pagination
    pub async fn list(
        pool: &PgPool,
        offset: i64,
        limit: i64,
        filter: SubmissionFilter,
    ) -> AppResult<(Vec<Submission>, i64)> {
        let status = filter.status.map(|s| s.as_str());
        let kind = filter.kind.map(|k| k.as_str());

        let submissions = sqlx::query_as::<_, SubmissionRow>(
            r#"
            SELECT * FROM submissions
            WHERE
                ($1::uuid IS NULL OR author_id = $1)
                AND ($2::uuid IS NULL OR $2 = ANY(reviewers))
                AND ($3::text IS NULL OR status = $3)
                AND ($4::text IS NULL OR kind = $4)
            ORDER BY created_at DESC
            OFFSET $5 LIMIT $6
            "#,
        )
        .bind(filter.author_id)
        .bind(filter.reviewer_id)
        .bind(status)
        .bind(kind)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(Submission::try_from)
        .collect::<AppResult<Vec<_>>>()?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM submissions
            WHERE
                ($1::uuid IS NULL OR author_id = $1)
                AND ($2::uuid IS NULL OR $2 = ANY(reviewers))
                AND ($3::text IS NULL OR status = $3)
                AND ($4::text IS NULL OR kind = $4)
            "#,
        )
        .bind(filter.author_id)
        .bind(filter.reviewer_id)
        .bind(status)
        .bind(kind)
        .fetch_one(pool)
        .await?;

        Ok((submissions, total))
    }

    /// Count submissions grouped by status, optionally for one author
    pub async fn count_by_status(
        pool: &PgPool,
        author_id: Option<&Uuid>,
    ) -> AppResult<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT status, COUNT(*) FROM submissions
            WHERE ($1::uuid IS NULL OR author_id = $1)
            GROUP BY status
            "#,
        )
        .bind(author_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// All submissions assigned to a reviewer (for dashboard tallies)
    pub async fn find_assigned(pool: &PgPool, reviewer_id: &Uuid) -> AppResult<Vec<Submission>> {
        sqlx::query_as::<_, SubmissionRow>(
            r#"SELECT * FROM submissions WHERE $1 = ANY(reviewers) ORDER BY created_at DESC"#,
        )
        .bind(reviewer_id)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(Submission::try_from)
        .collect()
    }
}
