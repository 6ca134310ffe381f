//! Shared data models for the ClipGif backend.
//!
//! This crate provides Serde-serializable types for:
//! - Media identifiers correlating transcripts, source videos and artifacts
//! - Timestamped transcripts and their persisted map representation
//! - Clip candidates, validated clips and rendered artifacts

pub mod clip;
pub mod media;
pub mod transcript;

// Re-export common types
pub use clip::{
    sanitize_caption, ClipCandidate, RenderedClip, ValidatedClip, CAPTION_MAX_CHARS,
    MAX_CLIPS_PER_BATCH,
};
pub use media::MediaId;
pub use transcript::{Transcript, TranscriptError, TranscriptSegment};
