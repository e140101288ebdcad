//! File handler implementations

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    state::AppState,
    utils::validation,
};

use super::response::UploadResponse;

fn multipart_error(e: MultipartError, limit: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!(
            "File exceeds the upload limit of {:.0}MB",
            limit as f64 / 1024.0 / 1024.0
        ))
    } else {
        AppError::Validation(format!("Failed to read multipart: {}", e))
    }
}

/// Upload a manuscript (multipart field `file`)
pub async fn upload_file(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadResponse>)> {
    let limit = state.config().storage.max_upload_bytes;
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload.pdf").to_string();
        let data = field.bytes().await.map_err(|e| multipart_error(e, limit))?;

        if data.len() > limit {
            return Err(AppError::PayloadTooLarge(format!(
                "File size ({:.2}MB) exceeds the upload limit ({:.2}MB)",
                data.len() as f64 / 1024.0 / 1024.0,
                limit as f64 / 1024.0 / 1024.0
            )));
        }

        upload = Some((file_name, data.to_vec()));
        break;
    }

    let (file_name, data) =
        upload.ok_or_else(|| AppError::Validation("Missing multipart field 'file'".to_string()))?;
    validation::validate_pdf_upload(&file_name, &data)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let stored = state.uploads().put(&file_name, &data).await?;
    tracing::info!(
        user_id = %auth_user.id,
        file = %stored.name,
        size = stored.size,
        "File uploaded"
    );

    Ok((StatusCode::CREATED, Json(stored.into())))
}

/// Serve a stored manuscript
pub async fn download_file(
    State(state): State<AppState>,
    _auth_user: AuthenticatedUser,
    Path(name): Path<String>,
) -> AppResult<Response> {
    let bytes = state.uploads().get(&name).await?;

    let mime = mime_guess::from_path(&name)
        .first_raw()
        .unwrap_or("application/octet-stream");

    Ok((
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", name),
            ),
        ],
        bytes,
    )
        .into_response())
}
