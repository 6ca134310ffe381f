//! FFmpeg and yt-dlp CLI wrappers for the ClipGif backend.
//!
//! Provides the external media transforms the pipeline depends on:
//! - [`command`] — FFmpeg command builder and runner
//! - [`gif`] — captioned animated-GIF rendering of a validated clip
//! - [`audio`] — audio track extraction for transcription
//! - [`download`] — source video download for URL ingest

pub mod audio;
pub mod command;
pub mod download;
pub mod error;
pub mod gif;

pub use command::{FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use gif::{render_gif, GifSpec};
