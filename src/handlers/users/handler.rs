//! User handler implementations

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    authorization::allow,
    constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
    error::{AppError, AppResult},
    handlers::auth::response::UserResponse,
    middleware::auth::AuthenticatedUser,
    models::Role,
    services::{user_service::ProfileChanges, UserService},
    state::AppState,
};

use super::{
    request::{ListUsersQuery, UpdateUserRequest, UpdateUserRoleRequest, UpdateUserStatusRequest},
    response::{ReviewersListResponse, UsersListResponse},
};

/// List users (admin)
pub async fn list_users(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<Json<UsersListResponse>> {
    auth_user.require_any(allow::MANAGE_USERS)?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let role = query
        .role
        .as_deref()
        .map(|r| Role::from_str(r).ok_or_else(|| AppError::Validation(format!("Invalid role: {}", r))))
        .transpose()?;

    let (users, total) = UserService::list_users(
        state.db(),
        page,
        per_page,
        query.search.as_deref(),
        role,
        query.active,
    )
    .await?;

    Ok(Json(UsersListResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
        total,
        page,
        per_page,
    }))
}

/// List active reviewers (admin, for assignment)
pub async fn list_reviewers(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<ReviewersListResponse>> {
    auth_user.require_any(allow::ASSIGN_REVIEWERS)?;

    let reviewers = UserService::list_active_reviewers(state.db()).await?;

    Ok(Json(ReviewersListResponse {
        reviewers: reviewers.into_iter().map(Into::into).collect(),
    }))
}

/// Get a user (self or admin)
pub async fn get_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = UserService::get_user(state.db(), &auth_user, &id).await?;
    Ok(Json(user.into()))
}

/// Update a user profile (self or admin)
pub async fn update_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    payload.validate()?;

    let user = UserService::update_profile(
        state.db(),
        &auth_user,
        &id,
        ProfileChanges {
            name: payload.name.as_deref(),
            institution: payload.institution.as_deref(),
            department: payload.department.as_deref(),
            phone: payload.phone.as_deref(),
            current_password: payload.current_password.as_deref(),
            new_password: payload.new_password.as_deref(),
        },
    )
    .await?;

    Ok(Json(user.into()))
}

/// Change a user's role (admin)
pub async fn update_user_role(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRoleRequest>,
) -> AppResult<Json<UserResponse>> {
    auth_user.require_any(allow::MANAGE_USERS)?;

    let role = Role::from_str(&payload.role).ok_or_else(|| {
        AppError::Validation(format!(
            "Invalid role: {}. Valid roles: student, reviewer, admin",
            payload.role
        ))
    })?;

    let user = UserService::update_role(state.db(), &auth_user, &id, role).await?;
    Ok(Json(user.into()))
}

/// Activate or deactivate a user (admin)
pub async fn update_user_status(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserStatusRequest>,
) -> AppResult<Json<UserResponse>> {
    auth_user.require_any(allow::MANAGE_USERS)?;

    let user = UserService::set_active(state.db(), &auth_user, &id, payload.is_active).await?;
    Ok(Json(user.into()))
}
