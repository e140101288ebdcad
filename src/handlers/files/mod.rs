//! Manuscript upload handlers

mod handler;
pub mod response;

pub use handler::*;
pub use response::*;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Extra room for multipart framing on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// File routes
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", post(handler::upload_file))
        .route("/{name}", get(handler::download_file))
        .layer(DefaultBodyLimit::max(max_upload_bytes + MULTIPART_OVERHEAD))
}
