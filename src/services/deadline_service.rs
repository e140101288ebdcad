//! Deadline service

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::repositories::DeadlineRepository,
    error::AppResult,
    models::{Deadline, DeadlineKind},
};

/// Deadline service for business logic
pub struct DeadlineService;

impl DeadlineService {
    /// All configured deadlines
    pub async fn list(pool: &PgPool) -> AppResult<Vec<Deadline>> {
        DeadlineRepository::list(pool).await
    }

    /// Set or move a deadline
    pub async fn set(
        pool: &PgPool,
        kind: DeadlineKind,
        due_at: DateTime<Utc>,
        updated_by: &Uuid,
    ) -> AppResult<Deadline> {
        let deadline = DeadlineRepository::upsert(pool, kind, due_at, updated_by).await?;
        tracing::info!(
            kind = %kind,
            due_at = %deadline.due_at.to_rfc3339(),
            by = %updated_by,
            "Deadline set"
        );
        Ok(deadline)
    }

    /// Fail if the deadline of `kind` has passed; an unset deadline never blocks
    pub async fn ensure_open(pool: &PgPool, kind: DeadlineKind, now: DateTime<Utc>) -> AppResult<()> {
        match DeadlineRepository::find(pool, kind).await? {
            Some(deadline) => deadline.ensure_open(now),
            None => Ok(()),
        }
    }
}
