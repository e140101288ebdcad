//! File storage
//!
//! Manuscripts and generated documents go through the [`FileStore`] trait so
//! the rest of the application only deals in stored names and public URLs.
//! [`LocalFileStore`] keeps everything under a directory on local disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    utils::{crypto, validation},
};

/// Longest sanitized original-name suffix kept in a stored file name
const MAX_NAME_SUFFIX: usize = 60;

/// Metadata of a stored file
#[derive(Debug, Clone, Serialize)]
pub struct StoredFile {
    /// Name under which the file is stored
    pub name: String,
    /// Public URL clients use as the file reference
    pub url: String,
    pub size: usize,
    pub sha256: String,
}

/// Storage backend for uploaded and generated files
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store `bytes`, deriving a unique name from `original_name`
    async fn put(&self, original_name: &str, bytes: &[u8]) -> AppResult<StoredFile>;

    /// Store `bytes` under exactly `name`, replacing any previous content
    async fn put_named(&self, name: &str, bytes: &[u8]) -> AppResult<StoredFile>;

    /// Read a stored file
    async fn get(&self, name: &str) -> AppResult<Vec<u8>>;

    /// Remove a stored file; missing files are not an error
    async fn delete(&self, name: &str) -> AppResult<()>;
}

/// Local-disk file store
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
    url_prefix: String,
}

impl LocalFileStore {
    /// Create a store rooted at `root`, serving files under `url_prefix`
    pub async fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> AppResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;

        Ok(Self {
            root,
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        })
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> AppResult<PathBuf> {
        validation::validate_stored_file_name(name)
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        Ok(self.root.join(name))
    }

    fn describe(&self, name: &str, bytes: &[u8]) -> StoredFile {
        StoredFile {
            name: name.to_string(),
            url: format!("{}/{}", self.url_prefix, name),
            size: bytes.len(),
            sha256: crypto::hash_bytes(bytes),
        }
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn put(&self, original_name: &str, bytes: &[u8]) -> AppResult<StoredFile> {
        let name = unique_name(original_name);
        self.put_named(&name, bytes).await
    }

    async fn put_named(&self, name: &str, bytes: &[u8]) -> AppResult<StoredFile> {
        let path = self.path_for(name)?;
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!(file = %name, size = bytes.len(), "Stored file");
        Ok(self.describe(name, bytes))
    }

    async fn get(&self, name: &str) -> AppResult<Vec<u8>> {
        let path = self.path_for(name)?;
        Ok(tokio::fs::read(&path).await?)
    }

    async fn delete(&self, name: &str) -> AppResult<()> {
        let path = self.path_for(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Build a collision-free stored name that keeps a readable suffix
pub fn unique_name(original_name: &str) -> String {
    let base = Path::new(original_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file");

    let mut suffix: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    while suffix.contains("..") {
        suffix = suffix.replace("..", ".");
    }
    // keep the tail so the extension survives
    let skip = suffix.chars().count().saturating_sub(MAX_NAME_SUFFIX);
    let suffix: String = suffix.chars().skip(skip).collect();

    format!("{}_{}", Uuid::new_v4().simple(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_name_is_safe() {
        let name = unique_name("../../etc/My Paper (final).pdf");
        assert!(validation::validate_stored_file_name(&name).is_ok());
        assert!(name.ends_with("My_Paper__final_.pdf"));
        assert_ne!(unique_name("a.pdf"), unique_name("a.pdf"));
    }

    #[test]
    fn test_unique_name_truncates_keeping_extension() {
        let long = format!("{}.pdf", "x".repeat(200));
        let name = unique_name(&long);
        assert!(name.ends_with(".pdf"));
        assert!(validation::validate_stored_file_name(&name).is_ok());
    }

    #[tokio::test]
    async fn test_local_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path(), "/api/v1/files/").await.unwrap();

        let stored = store.put("paper.pdf", b"%PDF-1.4 test").await.unwrap();
        assert!(stored.url.starts_with("/api/v1/files/"));
        assert_eq!(stored.size, 13);
        assert_eq!(store.get(&stored.name).await.unwrap(), b"%PDF-1.4 test");

        store.delete(&stored.name).await.unwrap();
        assert!(matches!(
            store.get(&stored.name).await,
            Err(AppError::NotFound(_))
        ));
        // deleting twice is fine
        tokio_test::assert_ok!(store.delete(&stored.name).await);
    }

    #[tokio::test]
    async fn test_local_store_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path(), "/files").await.unwrap();

        assert!(matches!(
            store.get("../secret").await,
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            store.put_named("a/b.pdf", b"x").await,
            Err(AppError::InvalidInput(_))
        ));
    }
}
