//! Review handler implementations

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    authorization::allow,
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    models::ReviewDecision,
    services::{DocumentService, ReviewService},
    state::AppState,
};

use super::{
    request::{AssignReviewersRequest, SubmitReviewRequest},
    response::{AssignmentResponse, FeedbackResponse, ReviewSubmittedResponse},
};

/// Replace the reviewers of a submission (admin)
pub async fn assign_reviewers(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignReviewersRequest>,
) -> AppResult<Json<AssignmentResponse>> {
    auth_user.require_any(allow::ASSIGN_REVIEWERS)?;
    payload.validate()?;

    let (submission, response, decision) =
        ReviewService::assign_reviewers(state.db(), &auth_user, &id, payload.reviewer_ids).await?;

    if decision.is_some() {
        DocumentService::spawn_generation(state.clone(), submission);
    }

    Ok(Json(response))
}

/// Submit a review for the current round (assigned reviewer)
pub async fn submit_review(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitReviewRequest>,
) -> AppResult<(StatusCode, Json<ReviewSubmittedResponse>)> {
    auth_user.require_any(allow::SUBMIT_REVIEW)?;
    payload.validate()?;

    let decision = ReviewDecision::from_str(&payload.decision).ok_or_else(|| {
        AppError::Validation(format!(
            "Invalid decision: {}. Valid decisions: approved, needs_revision, rejected",
            payload.decision
        ))
    })?;

    let (submission, response, outcome) =
        ReviewService::submit_review(state.db(), &auth_user, &id, decision, &payload.comment)
            .await?;

    if outcome.is_some() {
        DocumentService::spawn_generation(state.clone(), submission);
    }

    Ok((StatusCode::CREATED, Json(response)))
}

/// Review feedback of a submission
pub async fn get_feedback(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<FeedbackResponse>> {
    auth_user.require_any(allow::VIEW_FEEDBACK)?;

    let feedback = ReviewService::feedback(state.db(), &auth_user, &id).await?;
    Ok(Json(feedback))
}
