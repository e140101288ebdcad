//! Generated document model (certificates and appreciation letters)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{constants::VERIFICATION_CODE_LENGTH, error::AppError, utils::crypto};

/// Kind of generated document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Certificate for an author of an approved submission
    Certificate,
    /// Appreciation letter for a reviewer
    Letter,
}

impl DocumentKind {
    /// Get kind as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Certificate => "certificate",
            Self::Letter => "letter",
        }
    }

    /// Parse kind from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "certificate" => Some(Self::Certificate),
            "letter" => Some(Self::Letter),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Document database row
#[derive(Debug, Clone, FromRow)]
pub struct DocumentRow {
    pub id: Uuid,
    pub kind: String,
    pub submission_id: Uuid,
    pub recipient_id: Option<Uuid>,
    pub recipient_name: String,
    pub recipient_email: String,
    pub verification_code: String,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
}

/// Document domain model
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: Uuid,
    pub kind: DocumentKind,
    pub submission_id: Uuid,
    pub recipient_id: Option<Uuid>,
    pub recipient_name: String,
    pub recipient_email: String,
    pub verification_code: String,
    #[serde(skip_serializing)]
    pub file_name: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DocumentRow> for Document {
    type Error = AppError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        let kind = DocumentKind::from_str(&row.kind).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("Unknown document kind '{}'", row.kind))
        })?;

        Ok(Self {
            id: row.id,
            kind,
            submission_id: row.submission_id,
            recipient_id: row.recipient_id,
            recipient_name: row.recipient_name,
            recipient_email: row.recipient_email,
            verification_code: row.verification_code,
            file_name: row.file_name,
            created_at: row.created_at,
        })
    }
}

/// Stable verification code for a document.
///
/// The same submission, kind, and recipient always map to the same code, so a
/// regenerated document keeps the code printed on the earlier copy.
pub fn verification_code(submission_id: &Uuid, kind: DocumentKind, recipient_email: &str) -> String {
    let digest = crypto::hash_string(&format!(
        "{}:{}:{}",
        submission_id,
        kind.as_str(),
        recipient_email.to_lowercase()
    ));
    digest[..VERIFICATION_CODE_LENGTH].to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_code_is_stable_and_scoped() {
        let id = Uuid::new_v4();
        let a = verification_code(&id, DocumentKind::Certificate, "Ada@Example.com");
        let b = verification_code(&id, DocumentKind::Certificate, "ada@example.com");
        let c = verification_code(&id, DocumentKind::Letter, "ada@example.com");

        assert_eq!(a.len(), VERIFICATION_CODE_LENGTH);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
    }
}
