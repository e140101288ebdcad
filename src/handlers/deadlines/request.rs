//! Deadline request DTOs

use serde::Deserialize;

/// Set a deadline
#[derive(Debug, Deserialize)]
pub struct SetDeadlineRequest {
    /// RFC 3339 timestamp
    pub due_at: String,
}
