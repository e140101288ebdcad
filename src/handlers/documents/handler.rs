//! Document handler implementations

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::{
    authorization::allow,
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    models::DocumentKind,
    services::DocumentService,
    state::AppState,
};

use super::response::{DocumentsListResponse, VerificationResponse};

/// Certificates visible to the caller
pub async fn list_certificates(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<DocumentsListResponse>> {
    auth_user.require_any(allow::LIST_CERTIFICATES)?;
    list(&state, &auth_user, DocumentKind::Certificate).await
}

/// Appreciation letters visible to the caller
pub async fn list_letters(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<DocumentsListResponse>> {
    auth_user.require_any(allow::LIST_LETTERS)?;
    list(&state, &auth_user, DocumentKind::Letter).await
}

async fn list(
    state: &AppState,
    auth_user: &AuthenticatedUser,
    kind: DocumentKind,
) -> AppResult<Json<DocumentsListResponse>> {
    let documents = DocumentService::list(state.db(), auth_user, kind).await?;
    Ok(Json(DocumentsListResponse {
        documents: documents.into_iter().map(Into::into).collect(),
    }))
}

/// Regenerate the documents of a decided submission (admin)
pub async fn regenerate_documents(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<DocumentsListResponse>)> {
    auth_user.require_any(allow::GENERATE_DOCUMENTS)?;

    let documents = DocumentService::regenerate(&state, &id).await?;
    Ok((
        StatusCode::CREATED,
        Json(DocumentsListResponse {
            documents: documents.into_iter().map(Into::into).collect(),
        }),
    ))
}

/// Download a generated PDF
pub async fn download_document(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let (document, bytes) =
        DocumentService::download(state.db(), state.documents(), &auth_user, &id).await?;

    let disposition = format!(
        "attachment; filename=\"{}_{}.pdf\"",
        document.kind,
        document.verification_code
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// Public lookup by verification code
pub async fn verify_document(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<VerificationResponse>> {
    let (document, submission) = DocumentService::verify(state.db(), &code).await?;
    Ok(Json(VerificationResponse::new(document, submission)))
}

