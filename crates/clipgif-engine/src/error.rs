//! Engine error types.

use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

/// Errors in the clip-selection and rendering pipeline.
///
/// `MalformedModelOutput`, `UnrecognizedModelFormat` and `ModelTransport`
/// are fatal for an invocation and are never retried here. Per-item
/// problems (invalid candidates, failed renders) never surface as errors;
/// they are recovered locally by exclusion.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Model returned malformed output: {detail}")]
    MalformedModelOutput {
        detail: String,
        /// Raw reply text, kept for diagnostics
        raw: String,
    },

    #[error("Model returned an unrecognized format: {0}")]
    UnrecognizedModelFormat(String),

    #[error("Model transport failure: {0}")]
    ModelTransport(String),

    #[error("No transcript stored for media {0}")]
    TranscriptMissing(String),

    #[error("Unknown media: {0}")]
    UnknownMedia(String),

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("Whisper not found in PATH")]
    WhisperNotFound,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Media error: {0}")]
    Media(#[from] clipgif_media::MediaError),

    #[error("Transcript error: {0}")]
    Transcript(#[from] clipgif_models::TranscriptError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub fn malformed_output(detail: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::MalformedModelOutput {
            detail: detail.into(),
            raw: raw.into(),
        }
    }

    pub fn model_transport(msg: impl Into<String>) -> Self {
        Self::ModelTransport(msg.into())
    }

    pub fn transcription_failed(msg: impl Into<String>) -> Self {
        Self::TranscriptionFailed(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Whether the failure came from the model side (endpoint or output)
    /// rather than from this system.
    pub fn is_model_failure(&self) -> bool {
        matches!(
            self,
            EngineError::MalformedModelOutput { .. }
                | EngineError::UnrecognizedModelFormat(_)
                | EngineError::ModelTransport(_)
        )
    }
}
