//! Submission handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Submission routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(handler::create_submission).get(handler::list_submissions),
        )
        .route(
            "/{id}",
            get(handler::get_submission)
                .put(handler::update_submission)
                .delete(handler::delete_submission),
        )
        .route("/{id}/resubmit", post(handler::resubmit_submission))
}
