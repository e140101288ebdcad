//! Dashboard handler implementation

use axum::{extract::State, Json};

use crate::{
    error::AppResult, middleware::auth::AuthenticatedUser, services::DashboardService,
    state::AppState,
};

use super::response::DashboardResponse;

/// Role-aware overview for the caller
pub async fn get_dashboard(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<DashboardResponse>> {
    let dashboard = DashboardService::for_user(state.db(), &auth_user).await?;
    Ok(Json(dashboard))
}
