//! User management handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{get, put},
    Router,
};

use crate::state::AppState;

/// User routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_users))
        .route("/reviewers", get(handler::list_reviewers))
        .route("/{id}", get(handler::get_user).put(handler::update_user))
        .route("/{id}/role", put(handler::update_user_role))
        .route("/{id}/status", put(handler::update_user_status))
}
