//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod auth;
pub mod dashboard;
pub mod deadlines;
pub mod documents;
pub mod files;
pub mod health;
pub mod reviews;
pub mod submissions;
pub mod users;

use axum::{middleware, Router};

use crate::{middleware::auth::auth_middleware, state::AppState};

/// Create all API routes
pub fn routes(state: AppState) -> Router<AppState> {
    let max_upload_bytes = state.config().storage.max_upload_bytes;

    let protected = Router::new()
        .nest("/users", users::routes())
        .nest(
            "/submissions",
            submissions::routes()
                .merge(reviews::routes())
                .merge(documents::submission_routes()),
        )
        .nest("/files", files::routes(max_upload_bytes))
        .nest("/deadlines", deadlines::routes())
        .nest("/dashboard", dashboard::routes())
        .merge(documents::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(health::routes())
        .merge(documents::public_routes())
        .nest("/auth", auth::routes(state))
        .merge(protected)
}
