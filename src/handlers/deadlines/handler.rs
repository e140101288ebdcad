//! Deadline handler implementations

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    authorization::allow,
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    models::DeadlineKind,
    services::DeadlineService,
    state::AppState,
    utils::{now_utc, parse_datetime},
};

use super::{
    request::SetDeadlineRequest,
    response::{DeadlineResponse, DeadlinesListResponse},
};

/// List configured deadlines
pub async fn list_deadlines(
    State(state): State<AppState>,
    _auth_user: AuthenticatedUser,
) -> AppResult<Json<DeadlinesListResponse>> {
    let now = now_utc();
    let deadlines = DeadlineService::list(state.db()).await?;

    Ok(Json(DeadlinesListResponse {
        deadlines: deadlines
            .into_iter()
            .map(|d| DeadlineResponse::at(d, now))
            .collect(),
    }))
}

/// Set a deadline (admin)
pub async fn set_deadline(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(kind): Path<String>,
    Json(payload): Json<SetDeadlineRequest>,
) -> AppResult<Json<DeadlineResponse>> {
    auth_user.require_any(allow::MANAGE_DEADLINES)?;

    let kind = DeadlineKind::from_str(&kind).ok_or_else(|| {
        AppError::NotFound(format!(
            "Unknown deadline: {}. Valid deadlines: submission, resubmission",
            kind
        ))
    })?;
    let due_at = parse_datetime(&payload.due_at).ok_or_else(|| {
        AppError::Validation("due_at must be an RFC 3339 timestamp".to_string())
    })?;

    let deadline = DeadlineService::set(state.db(), kind, due_at, &auth_user.id).await?;
    Ok(Json(DeadlineResponse::at(deadline, now_utc())))
}
