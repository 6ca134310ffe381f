//! On-disk transcript store.
//!
//! Persists the time-segmented transcript for a media identifier as a
//! `{"<start>-<end>": text}` JSON map (two-decimal keys, document order),
//! plus the source file's extension marker used for media lookup.

use std::path::PathBuf;

use serde_json::{Map, Value};
use tracing::debug;

use clipgif_models::{MediaId, Transcript};

use crate::error::{EngineError, EngineResult};

/// Store for transcripts and extension markers, keyed by media ID.
#[derive(Debug, Clone)]
pub struct TranscriptStore {
    audio_dir: PathBuf,
}

impl TranscriptStore {
    pub fn new(audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            audio_dir: audio_dir.into(),
        }
    }

    fn timestamps_path(&self, media_id: &MediaId) -> PathBuf {
        self.audio_dir.join(format!("{}.timestamps.json", media_id))
    }

    fn ext_path(&self, media_id: &MediaId) -> PathBuf {
        self.audio_dir.join(format!("{}.ext.txt", media_id))
    }

    /// Persist a transcript. Overwrites any previous transcript for the ID.
    pub async fn save(&self, media_id: &MediaId, transcript: &Transcript) -> EngineResult<()> {
        tokio::fs::create_dir_all(&self.audio_dir).await?;

        let map = transcript.to_map();
        let json = serde_json::to_string_pretty(&Value::Object(map))?;

        let path = self.timestamps_path(media_id);
        tokio::fs::write(&path, json).await?;
        debug!("Saved transcript: {}", path.display());
        Ok(())
    }

    /// Load the transcript for a media ID.
    pub async fn load(&self, media_id: &MediaId) -> EngineResult<Transcript> {
        let path = self.timestamps_path(media_id);
        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(EngineError::TranscriptMissing(media_id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let map: Map<String, Value> = serde_json::from_str(&json)?;
        Ok(Transcript::from_map(&map)?)
    }

    /// Persist the source file extension (including the leading dot).
    pub async fn save_extension(&self, media_id: &MediaId, ext: &str) -> EngineResult<()> {
        tokio::fs::create_dir_all(&self.audio_dir).await?;
        tokio::fs::write(self.ext_path(media_id), ext).await?;
        Ok(())
    }

    /// Load the source file extension for a media ID.
    pub async fn load_extension(&self, media_id: &MediaId) -> EngineResult<String> {
        match tokio::fs::read_to_string(self.ext_path(media_id)).await {
            Ok(ext) => Ok(ext.trim().to_string()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(EngineError::UnknownMedia(media_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
