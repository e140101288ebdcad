//! User response DTOs

use serde::Serialize;
use uuid::Uuid;

use crate::{handlers::auth::response::UserResponse, models::User};

/// User list response
#[derive(Debug, Serialize)]
pub struct UsersListResponse {
    pub users: Vec<UserResponse>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

/// Reviewer option shown when assigning reviewers
#[derive(Debug, Serialize)]
pub struct ReviewerSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub institution: Option<String>,
}

impl From<User> for ReviewerSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            institution: user.institution,
        }
    }
}

/// Active reviewers response
#[derive(Debug, Serialize)]
pub struct ReviewersListResponse {
    pub reviewers: Vec<ReviewerSummary>,
}
