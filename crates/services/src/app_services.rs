use std::path::Path;
use std::sync::Arc;

use storage::repository::Storage;

use crate::content_service::ContentService;
use crate::error::AppServicesError;
use crate::progress_service::ProgressService;
use crate::Clock;

/// Assembles the app-facing services over a chosen storage backend.
#[derive(Clone)]
pub struct AppServices {
    progress: Arc<ProgressService>,
    content: Arc<ContentService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails. Content
    /// loading never fails; unusable files degrade per source.
    pub async fn new_sqlite(
        db_url: &str,
        content_root: &Path,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::with_storage(storage, content_root, clock))
    }

    /// Build services over in-memory storage, for tests and hosts without
    /// durable storage.
    #[must_use]
    pub fn in_memory(content_root: &Path, clock: Clock) -> Self {
        Self::with_storage(Storage::in_memory(), content_root, clock)
    }

    fn with_storage(storage: Storage, content_root: &Path, clock: Clock) -> Self {
        let progress = Arc::new(ProgressService::new(clock, Arc::clone(&storage.documents)));
        let content = Arc::new(ContentService::from_sources(content_root));
        Self { progress, content }
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn content(&self) -> Arc<ContentService> {
        Arc::clone(&self.content)
    }
}
