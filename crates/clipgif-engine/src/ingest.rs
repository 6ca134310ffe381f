//! Media ingest: source persistence, audio extraction, transcription.
//!
//! Runs once per uploaded or downloaded video and leaves behind everything
//! the clip pipeline needs later: the source file in the upload dir, the
//! extension marker, and the persisted timestamp map.

use std::path::Path;

use tracing::info;

use clipgif_media::audio::extract_audio;
use clipgif_media::download::download_video;
use clipgif_models::MediaId;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::transcribe::WhisperTranscriber;
use crate::transcript_store::TranscriptStore;

/// Result of ingesting one piece of media.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub media_id: MediaId,
    /// Full transcript text (segments joined)
    pub transcript_text: String,
    pub segment_count: usize,
}

/// Ingest coordinator.
#[derive(Debug, Clone)]
pub struct Ingestor {
    config: EngineConfig,
    store: TranscriptStore,
    transcriber: WhisperTranscriber,
}

impl Ingestor {
    pub fn new(config: EngineConfig) -> Self {
        let store = TranscriptStore::new(&config.audio_dir);
        let transcriber =
            WhisperTranscriber::new(&config.whisper_model, &config.whisper_language);
        Self {
            config,
            store,
            transcriber,
        }
    }

    /// Ingest a source video already placed under the upload directory.
    ///
    /// `source` must be `{upload_dir}/{media_id}{ext}`; the caller (upload
    /// handler or URL download) establishes that.
    pub async fn ingest_file(&self, media_id: &MediaId, source: &Path) -> EngineResult<IngestOutcome> {
        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .ok_or_else(|| {
                EngineError::config_error(format!(
                    "Source file has no extension: {}",
                    source.display()
                ))
            })?;

        info!(%media_id, "Ingesting media: {}", source.display());

        self.store.save_extension(media_id, &ext).await?;

        let audio_path = self.config.audio_dir.join(format!("{}.mp3", media_id));
        tokio::fs::create_dir_all(&self.config.audio_dir).await?;
        extract_audio(source, &audio_path).await?;

        let transcript = self
            .transcriber
            .transcribe(&audio_path, &self.config.audio_dir)
            .await?;
        self.store.save(media_id, &transcript).await?;

        info!(%media_id, segments = transcript.len(), "Ingest complete");

        Ok(IngestOutcome {
            media_id: media_id.clone(),
            transcript_text: transcript.full_text(),
            segment_count: transcript.len(),
        })
    }

    /// Download a video by URL and ingest it under a fresh media ID.
    pub async fn ingest_url(&self, url: &str) -> EngineResult<IngestOutcome> {
        let media_id = MediaId::new();
        let source = download_video(url, &self.config.upload_dir, media_id.as_str()).await?;
        self.ingest_file(&media_id, &source).await
    }
}
