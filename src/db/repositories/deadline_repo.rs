//! Deadline repository

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Deadline, DeadlineKind, DeadlineRow},
};

/// Repository for deadline database operations
pub struct DeadlineRepository;

impl DeadlineRepository {
    /// Find the deadline of one kind
    pub async fn find(pool: &PgPool, kind: DeadlineKind) -> AppResult<Option<Deadline>> {
        sqlx::query_as::<_, DeadlineRow>(r#"SELECT * FROM deadlines WHERE kind = $1"#)
            .bind(kind.as_str())
            .fetch_optional(pool)
            .await?
            .map(Deadline::try_from)
            .transpose()
    }

    /// List all configured deadlines
    pub async fn list(pool: &PgPool) -> AppResult<Vec<Deadline>> {
        sqlx::query_as::<_, DeadlineRow>(r#"SELECT * FROM deadlines ORDER BY kind"#)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(Deadline::try_from)
            .collect()
    }

    /// Insert or replace a deadline
    pub async fn upsert(
        pool: &PgPool,
        kind: DeadlineKind,
        due_at: DateTime<Utc>,
        updated_by: &Uuid,
    ) -> AppResult<Deadline> {
        let row = sqlx::query_as::<_, DeadlineRow>(
            r#"
            INSERT INTO deadlines (kind, due_at, updated_by, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (kind) DO UPDATE
            SET due_at = EXCLUDED.due_at,
                updated_by = EXCLUDED.updated_by,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(kind.as_str())
        .bind(due_at)
        .bind(updated_by)
        .fetch_one(pool)
        .await?;

        row.try_into()
    }
}
