//! Dashboard response DTOs

use std::collections::BTreeMap;

use serde::Serialize;

/// Role-specific dashboard
#[derive(Debug, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum DashboardResponse {
    Student {
        submissions: BTreeMap<String, i64>,
        total_submissions: i64,
    },
    Reviewer {
        assigned: usize,
        pending: usize,
        reviewed: usize,
    },
    Admin {
        submissions: BTreeMap<String, i64>,
        total_submissions: i64,
        users: BTreeMap<String, i64>,
        total_users: i64,
    },
}
