//! Review workflow handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;

/// Review routes, mounted next to the submission routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/{id}/reviewers", put(handler::assign_reviewers))
        .route("/{id}/reviews", post(handler::submit_review))
        .route("/{id}/feedback", get(handler::get_feedback))
}
