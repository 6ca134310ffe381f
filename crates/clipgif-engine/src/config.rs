//! Engine configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Ollama endpoint base URL
    pub ollama_url: String,
    /// Model name passed to the chat endpoint
    pub ollama_model: String,
    /// Timeout for one model invocation
    pub model_timeout: Duration,
    /// Directory holding uploaded/downloaded source videos
    pub upload_dir: PathBuf,
    /// Directory holding extracted audio, transcripts and markers
    pub audio_dir: PathBuf,
    /// Directory holding rendered artifacts (served statically)
    pub output_dir: PathBuf,
    /// Whisper model name
    pub whisper_model: String,
    /// Whisper language code
    pub whisper_language: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "phi3".to_string(),
            model_timeout: Duration::from_secs(120),
            upload_dir: PathBuf::from("./uploads"),
            audio_dir: PathBuf::from("./audio"),
            output_dir: PathBuf::from("./output"),
            whisper_model: "base".to_string(),
            whisper_language: "en".to_string(),
        }
    }
}

impl EngineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ollama_url: std::env::var("OLLAMA_URL").unwrap_or(defaults.ollama_url),
            ollama_model: std::env::var("OLLAMA_MODEL").unwrap_or(defaults.ollama_model),
            model_timeout: Duration::from_secs(
                std::env::var("MODEL_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            audio_dir: std::env::var("AUDIO_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.audio_dir),
            output_dir: std::env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            whisper_model: std::env::var("WHISPER_MODEL").unwrap_or(defaults.whisper_model),
            whisper_language: std::env::var("WHISPER_LANGUAGE")
                .unwrap_or(defaults.whisper_language),
        }
    }

    /// Create the working directories if they do not exist.
    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;
        tokio::fs::create_dir_all(&self.audio_dir).await?;
        tokio::fs::create_dir_all(&self.output_dir).await?;
        Ok(())
    }
}
