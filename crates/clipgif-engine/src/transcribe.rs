//! Whisper CLI transcription adapter.
//!
//! Spawns the `whisper` CLI against an extracted audio file and parses its
//! segment JSON into a [`Transcript`]. Transcription is an external
//! collaborator; only this adapter knows about whisper's invocation and
//! output layout.

use std::path::Path;

use serde::Deserialize;
use tokio::process::Command;
use tracing::{info, warn};

use clipgif_models::{Transcript, TranscriptSegment};

use crate::error::{EngineError, EngineResult};

/// Whisper's JSON output, reduced to the fields we consume.
#[derive(Debug, Deserialize)]
struct WhisperOutput {
    segments: Vec<WhisperSegment>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    start: f64,
    end: f64,
    text: String,
}

/// Whisper CLI transcriber.
#[derive(Debug, Clone)]
pub struct WhisperTranscriber {
    model: String,
    language: String,
}

impl WhisperTranscriber {
    pub fn new(model: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            language: language.into(),
        }
    }

    /// Transcribe an audio file, writing whisper's output into `out_dir`.
    pub async fn transcribe(&self, audio: &Path, out_dir: &Path) -> EngineResult<Transcript> {
        which::which("whisper").map_err(|_| EngineError::WhisperNotFound)?;

        tokio::fs::create_dir_all(out_dir).await?;

        info!(
            "Transcribing {} (model: {}, language: {})",
            audio.display(),
            self.model,
            self.language
        );

        let output = Command::new("whisper")
            .arg(audio)
            .args(["--model", &self.model])
            .args(["--language", &self.language])
            .args(["--output_format", "json"])
            .arg("--output_dir")
            .arg(out_dir)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::transcription_failed(format!(
                "whisper exited with {:?}: {}",
                output.status.code(),
                stderr.trim()
            )));
        }

        // Whisper names its output after the audio file stem
        let stem = audio
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| EngineError::transcription_failed("Audio path has no file stem"))?;
        let json_path = out_dir.join(format!("{}.json", stem));

        let json = tokio::fs::read_to_string(&json_path).await.map_err(|e| {
            EngineError::transcription_failed(format!(
                "Missing whisper output {}: {}",
                json_path.display(),
                e
            ))
        })?;

        let transcript = parse_whisper_output(&json)?;
        info!(
            "Transcription finished: {} segments",
            transcript.len()
        );
        Ok(transcript)
    }
}

/// Parse whisper's JSON into an ordered transcript.
///
/// Degenerate segments (non-finite bounds or `start >= end`) are logged and
/// dropped so the segment invariant holds downstream.
fn parse_whisper_output(json: &str) -> EngineResult<Transcript> {
    let output: WhisperOutput = serde_json::from_str(json)
        .map_err(|e| EngineError::transcription_failed(format!("Invalid whisper JSON: {}", e)))?;

    let mut segments = Vec::with_capacity(output.segments.len());
    for seg in output.segments {
        let segment = TranscriptSegment::new(seg.start, seg.end, seg.text.trim());
        if !segment.is_well_formed() {
            warn!(start = seg.start, end = seg.end, "Dropping degenerate whisper segment");
            continue;
        }
        segments.push(segment);
    }

    Ok(Transcript::new(segments))
}
