//! Deadline model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Which operation a deadline gates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineKind {
    Submission,
    Resubmission,
}

impl DeadlineKind {
    /// Get kind as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submission => "submission",
            Self::Resubmission => "resubmission",
        }
    }

    /// Parse kind from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "submission" => Some(Self::Submission),
            "resubmission" => Some(Self::Resubmission),
            _ => None,
        }
    }
}

impl std::fmt::Display for DeadlineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Deadline database row
#[derive(Debug, Clone, FromRow)]
pub struct DeadlineRow {
    pub kind: String,
    pub due_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

/// Deadline domain model
#[derive(Debug, Clone, Serialize)]
pub struct Deadline {
    pub kind: DeadlineKind,
    pub due_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DeadlineRow> for Deadline {
    type Error = AppError;

    fn try_from(row: DeadlineRow) -> Result<Self, Self::Error> {
        let kind = DeadlineKind::from_str(&row.kind).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("Unknown deadline kind '{}'", row.kind))
        })?;

        Ok(Self {
            kind,
            due_at: row.due_at,
            updated_by: row.updated_by,
            updated_at: row.updated_at,
        })
    }
}

impl Deadline {
    /// Fail if `now` is past the deadline
    pub fn ensure_open(&self, now: DateTime<Utc>) -> AppResult<()> {
        if now > self.due_at {
            return Err(AppError::DeadlinePassed(format!(
                "The {} deadline was {}",
                self.kind,
                self.due_at.to_rfc3339()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_ensure_open() {
        let now = Utc::now();
        let deadline = Deadline {
            kind: DeadlineKind::Submission,
            due_at: now,
            updated_by: None,
            updated_at: now,
        };

        assert!(deadline.ensure_open(now - Duration::minutes(1)).is_ok());
        assert!(deadline.ensure_open(now).is_ok());
        assert!(matches!(
            deadline.ensure_open(now + Duration::seconds(1)),
            Err(AppError::DeadlinePassed(_))
        ));
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!(DeadlineKind::from_str("resubmission"), Some(DeadlineKind::Resubmission));
        assert_eq!(DeadlineKind::from_str("review"), None);
    }
}
