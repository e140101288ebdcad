//! Certificate and letter handlers

mod handler;
pub mod response;

pub use handler::*;
pub use response::*;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Document routes that need an authenticated caller
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/certificates", get(handler::list_certificates))
        .route("/letters", get(handler::list_letters))
        .route("/documents/{id}/download", get(handler::download_document))
}

/// Regeneration route, mounted under `/submissions`
pub fn submission_routes() -> Router<AppState> {
    Router::new().route("/{id}/documents", post(handler::regenerate_documents))
}

/// Public verification route
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/documents/verify/{code}", get(handler::verify_document))
}
