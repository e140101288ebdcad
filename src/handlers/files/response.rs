//! File response DTOs

use serde::Serialize;

use crate::storage::StoredFile;

/// Upload result
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Reference to pass as `file_url` when submitting
    pub file_url: String,
    pub name: String,
    pub size: usize,
    pub sha256: String,
}

impl From<StoredFile> for UploadResponse {
    fn from(file: StoredFile) -> Self {
        Self {
            file_url: file.url,
            name: file.name,
            size: file.size,
            sha256: file.sha256,
        }
    }
}
