//! Deadline response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Deadline, DeadlineKind};

/// Deadline with its current state
#[derive(Debug, Serialize)]
pub struct DeadlineResponse {
    pub kind: DeadlineKind,
    pub due_at: DateTime<Utc>,
    pub is_open: bool,
    pub updated_at: DateTime<Utc>,
}

impl DeadlineResponse {
    pub fn at(deadline: Deadline, now: DateTime<Utc>) -> Self {
        Self {
            is_open: deadline.ensure_open(now).is_ok(),
            kind: deadline.kind,
            due_at: deadline.due_at,
            updated_at: deadline.updated_at,
        }
    }
}

/// Deadline list response
#[derive(Debug, Serialize)]
pub struct DeadlinesListResponse {
    pub deadlines: Vec<DeadlineResponse>,
}
