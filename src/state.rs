//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use redis::aio::ConnectionManager;
use sqlx::PgPool;

use crate::{config::Config, pdf::PdfRenderer, storage::FileStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Database connection pool
    db: PgPool,

    /// Redis connection manager
    redis: ConnectionManager,

    /// Uploaded manuscripts
    uploads: Arc<dyn FileStore>,

    /// Generated certificates and letters
    documents: Arc<dyn FileStore>,

    /// PDF renderer for generated documents
    renderer: PdfRenderer,

    /// Application configuration
    config: Config,
}

impl AppState {
    /// Create a new application state
    pub fn new(
        db: PgPool,
        redis: ConnectionManager,
        uploads: Arc<dyn FileStore>,
        documents: Arc<dyn FileStore>,
        config: Config,
    ) -> Self {
        let renderer = PdfRenderer::new(
            config.documents.fonts_path.clone(),
            config.documents.organization.clone(),
        );

        Self {
            inner: Arc::new(AppStateInner {
                db,
                redis,
                uploads,
                documents,
                renderer,
                config,
            }),
        }
    }

    /// Get a reference to the database pool
    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    /// Get a clone of the Redis connection manager
    pub fn redis(&self) -> ConnectionManager {
        self.inner.redis.clone()
    }

    /// Store for uploaded manuscripts
    pub fn uploads(&self) -> &dyn FileStore {
        self.inner.uploads.as_ref()
    }

    /// Store for generated documents
    pub fn documents(&self) -> &dyn FileStore {
        self.inner.documents.as_ref()
    }

    /// PDF renderer
    pub fn renderer(&self) -> &PdfRenderer {
        &self.inner.renderer
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
