//! Submission request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::{constants::MAX_NAME_LENGTH, models::Author};

/// Author entry as sent by clients
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AuthorInput {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: String,

    #[validate(email)]
    pub email: String,
}

impl From<AuthorInput> for Author {
    fn from(input: AuthorInput) -> Self {
        Author {
            name: input.name,
            email: input.email,
        }
    }
}

/// Create submission request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubmissionRequest {
    /// research_paper or project
    pub kind: String,

    #[validate(length(min = 1, max = 300))]
    pub title: String,

    #[validate(nested)]
    pub authors: Vec<AuthorInput>,

    /// URL returned by the upload endpoint, or an external link
    #[validate(length(min = 1, max = 2048))]
    pub file_url: String,
}

/// Update submission request (owner, while submitted)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSubmissionRequest {
    pub kind: Option<String>,

    #[validate(length(min = 1, max = 300))]
    pub title: Option<String>,

    #[validate(nested)]
    pub authors: Option<Vec<AuthorInput>>,

    #[validate(length(min = 1, max = 2048))]
    pub file_url: Option<String>,
}

/// Resubmit after a needs_revision outcome
#[derive(Debug, Deserialize, Validate)]
pub struct ResubmitRequest {
    #[validate(length(min = 1, max = 2048))]
    pub file_url: String,

    #[validate(length(min = 1, max = 300))]
    pub title: Option<String>,

    #[validate(nested)]
    pub authors: Option<Vec<AuthorInput>>,
}

/// List submissions query parameters
#[derive(Debug, Deserialize)]
pub struct ListSubmissionsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<String>,
    pub kind: Option<String>,
}
