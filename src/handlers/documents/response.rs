//! Document response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Document, DocumentKind, Submission, SubmissionKind};

/// Generated document metadata
#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub kind: DocumentKind,
    pub submission_id: Uuid,
    pub recipient_name: String,
    pub recipient_email: String,
    pub verification_code: String,
    pub download_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        Self {
            download_url: format!("/api/v1/documents/{}/download", doc.id),
            id: doc.id,
            kind: doc.kind,
            submission_id: doc.submission_id,
            recipient_name: doc.recipient_name,
            recipient_email: doc.recipient_email,
            verification_code: doc.verification_code,
            created_at: doc.created_at,
        }
    }
}

/// Document list response
#[derive(Debug, Serialize)]
pub struct DocumentsListResponse {
    pub documents: Vec<DocumentResponse>,
}

/// Public verification result; carries no contact details
#[derive(Debug, Serialize)]
pub struct VerificationResponse {
    pub valid: bool,
    pub kind: DocumentKind,
    pub recipient_name: String,
    pub submission_title: String,
    pub submission_kind: SubmissionKind,
    pub issued_at: DateTime<Utc>,
}

impl VerificationResponse {
    pub fn new(document: Document, submission: Submission) -> Self {
        Self {
            valid: true,
            kind: document.kind,
            recipient_name: document.recipient_name,
            submission_title: submission.title,
            submission_kind: submission.kind,
            issued_at: document.created_at,
        }
    }
}
