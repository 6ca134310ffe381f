//! Clip-selection and rendering pipeline.
//!
//! Converts a stored timestamped transcript into AI-proposed time spans,
//! validates and sanitizes those spans, and renders each valid span into a
//! captioned looping GIF — sequentially, with per-clip failure isolation
//! and a hard cap of three artifacts per invocation.
//!
//! External collaborators (the model endpoint, media lookup, the renderer)
//! are trait seams so the orchestrator can run against fakes in tests.

pub mod config;
pub mod error;
pub mod ingest;
pub mod library;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod render;
pub mod transcribe;
pub mod transcript_store;
pub mod validate;

// Re-export common types
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use ingest::{IngestOutcome, Ingestor};
pub use library::{DiskLibrary, MediaLibrary};
pub use model::{ModelClient, OllamaClient};
pub use parser::parse_model_reply;
pub use pipeline::ClipPipeline;
pub use prompt::build_clip_prompt;
pub use render::{ClipRenderer, GifRenderer};
pub use transcribe::WhisperTranscriber;
pub use transcript_store::TranscriptStore;
pub use validate::filter_candidates;

use clipgif_models::MediaId;

/// The production pipeline type wired to Ollama, the disk library and the
/// FFmpeg GIF renderer.
pub type ProductionPipeline = ClipPipeline<OllamaClient, DiskLibrary, GifRenderer>;

/// Build the production pipeline from configuration.
pub fn build_pipeline(config: &EngineConfig) -> EngineResult<ProductionPipeline> {
    let store = TranscriptStore::new(&config.audio_dir);
    let model = OllamaClient::new(config)?;
    let library = DiskLibrary::new(&config.upload_dir, store.clone());
    let renderer = GifRenderer::default();

    Ok(ClipPipeline::new(
        model,
        library,
        renderer,
        store,
        &config.output_dir,
    ))
}

/// Output artifact filename prefix for a media ID (`{id}_clip_`).
pub fn clip_filename_prefix(media_id: &MediaId) -> String {
    format!("{}_clip_", media_id)
}
