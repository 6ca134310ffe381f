//! Audio track extraction for transcription.

use std::path::Path;

use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Extract the audio track of a video to an mp3 file.
///
/// The transcription step consumes audio only; stripping the video stream
/// keeps the intermediate artifact small.
pub async fn extract_audio(
    video: impl AsRef<Path>,
    audio_out: impl AsRef<Path>,
) -> MediaResult<()> {
    let video = video.as_ref();
    let audio_out = audio_out.as_ref();

    if !video.exists() {
        return Err(MediaError::FileNotFound(video.to_path_buf()));
    }

    info!(
        "Extracting audio: {} -> {}",
        video.display(),
        audio_out.display()
    );

    let cmd = FfmpegCommand::new(video, audio_out)
        .no_video()
        .audio_codec("libmp3lame");

    FfmpegRunner::new().run(&cmd).await?;

    info!("Audio extracted: {}", audio_out.display());
    Ok(())
}
