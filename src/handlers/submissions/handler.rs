//! Submission handler implementations

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    authorization::allow,
    constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
    db::repositories::SubmissionFilter,
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    models::{SubmissionEdit, SubmissionKind, SubmissionStatus},
    services::{
        submission_service::{NewSubmission, Resubmission},
        SubmissionService,
    },
    state::AppState,
};

use super::{
    request::{
        CreateSubmissionRequest, ListSubmissionsQuery, ResubmitRequest, UpdateSubmissionRequest,
    },
    response::{SubmissionResponse, SubmissionsListResponse},
};

fn parse_kind(s: &str) -> AppResult<SubmissionKind> {
    SubmissionKind::from_str(s).ok_or_else(|| {
        AppError::Validation(format!(
            "Invalid kind: {}. Valid kinds: research_paper, project",
            s
        ))
    })
}

/// Create a new submission
pub async fn create_submission(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateSubmissionRequest>,
) -> AppResult<(StatusCode, Json<SubmissionResponse>)> {
    auth_user.require_any(allow::CREATE_SUBMISSION)?;
    payload.validate()?;

    let submission = SubmissionService::create(
        state.db(),
        &auth_user,
        NewSubmission {
            kind: parse_kind(&payload.kind)?,
            title: payload.title,
            authors: payload.authors.into_iter().map(Into::into).collect(),
            file_url: payload.file_url,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse::for_viewer(submission, &auth_user)),
    ))
}

/// List submissions visible to the caller
pub async fn list_submissions(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<ListSubmissionsQuery>,
) -> AppResult<Json<SubmissionsListResponse>> {
    auth_user.require_any(allow::VIEW_SUBMISSION)?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

    let status = query
        .status
        .as_deref()
        .map(|s| {
            SubmissionStatus::from_str(s)
                .ok_or_else(|| AppError::Validation(format!("Invalid status: {}", s)))
        })
        .transpose()?;
    let kind = query.kind.as_deref().map(parse_kind).transpose()?;

    let (submissions, total) = SubmissionService::list(
        state.db(),
        &auth_user,
        page,
        per_page,
        SubmissionFilter {
            status,
            kind,
            ..Default::default()
        },
    )
    .await?;

    Ok(Json(SubmissionsListResponse {
        submissions: submissions
            .into_iter()
            .map(|s| SubmissionResponse::for_viewer(s, &auth_user))
            .collect(),
        total,
        page,
        per_page,
    }))
}

/// Get a submission
pub async fn get_submission(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SubmissionResponse>> {
    let submission = SubmissionService::get(state.db(), &auth_user, &id).await?;
    Ok(Json(SubmissionResponse::for_viewer(submission, &auth_user)))
}

/// Edit a submission before review starts
pub async fn update_submission(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSubmissionRequest>,
) -> AppResult<Json<SubmissionResponse>> {
    auth_user.require_any(allow::EDIT_SUBMISSION)?;
    payload.validate()?;

    let edit = SubmissionEdit {
        kind: payload.kind.as_deref().map(parse_kind).transpose()?,
        title: payload.title,
        authors: payload
            .authors
            .map(|authors| authors.into_iter().map(Into::into).collect()),
        file_url: payload.file_url,
    };

    let submission = SubmissionService::update(state.db(), &auth_user, &id, edit).await?;
    Ok(Json(SubmissionResponse::for_viewer(submission, &auth_user)))
}

/// Delete a submission
pub async fn delete_submission(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    auth_user.require_any(allow::DELETE_SUBMISSION)?;

    SubmissionService::delete(state.db(), state.uploads(), state.documents(), &auth_user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Resubmit after a needs_revision outcome
pub async fn resubmit_submission(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ResubmitRequest>,
) -> AppResult<Json<SubmissionResponse>> {
    auth_user.require_any(allow::RESUBMIT)?;
    payload.validate()?;

    let submission = SubmissionService::resubmit(
        state.db(),
        &auth_user,
        &id,
        Resubmission {
            file_url: payload.file_url,
            title: payload.title,
            authors: payload
                .authors
                .map(|authors| authors.into_iter().map(Into::into).collect()),
        },
    )
    .await?;

    Ok(Json(SubmissionResponse::for_viewer(submission, &auth_user)))
}
