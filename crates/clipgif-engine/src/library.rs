//! Media source lookup.

use std::path::PathBuf;

use async_trait::async_trait;

use clipgif_models::MediaId;

use crate::error::{EngineError, EngineResult};
use crate::transcript_store::TranscriptStore;

/// Resolves a media identifier to its on-disk source video.
#[async_trait]
pub trait MediaLibrary: Send + Sync {
    async fn resolve_source(&self, media_id: &MediaId) -> EngineResult<PathBuf>;
}

#[async_trait]
impl<T: MediaLibrary + ?Sized> MediaLibrary for std::sync::Arc<T> {
    async fn resolve_source(&self, media_id: &MediaId) -> EngineResult<PathBuf> {
        (**self).resolve_source(media_id).await
    }
}

/// Library over the upload directory, using the persisted extension marker.
#[derive(Debug, Clone)]
pub struct DiskLibrary {
    upload_dir: PathBuf,
    store: TranscriptStore,
}

impl DiskLibrary {
    pub fn new(upload_dir: impl Into<PathBuf>, store: TranscriptStore) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            store,
        }
    }
}

#[async_trait]
impl MediaLibrary for DiskLibrary {
    async fn resolve_source(&self, media_id: &MediaId) -> EngineResult<PathBuf> {
        let ext = self.store.load_extension(media_id).await?;
        let path = self.upload_dir.join(format!("{}{}", media_id, ext));

        if !path.exists() {
            return Err(EngineError::UnknownMedia(media_id.to_string()));
        }

        Ok(path)
    }
}
