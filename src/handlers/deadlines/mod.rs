//! Deadline handlers

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

/// Deadline routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_deadlines))
        .route("/{kind}", put(handler::set_deadline))
}
