//! Captioned animated-GIF rendering.
//!
//! Renders one validated clip span of a source video as a looping GIF:
//! fixed width, fixed frame rate, caption burned in near the bottom over a
//! semi-opaque box. One FFmpeg process per call; the caller serializes
//! renders to bound peak resource usage.

use std::path::Path;

use metrics::counter;
use tracing::info;

use clipgif_models::ValidatedClip;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Rendering parameters for GIF output.
#[derive(Debug, Clone)]
pub struct GifSpec {
    /// Output width in pixels; height auto-scales preserving aspect ratio
    pub width: u32,
    /// Output frame rate
    pub fps: u32,
    /// Caption font size in points
    pub font_size: u32,
    /// Caption distance from the bottom edge in pixels
    pub bottom_margin: u32,
    /// Caption box opacity (0.0 transparent, 1.0 opaque)
    pub box_opacity: f32,
    /// Caption box border width in pixels
    pub box_border: u32,
    /// Per-render timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GifSpec {
    fn default() -> Self {
        Self {
            width: 480,
            fps: 15,
            font_size: 36,
            bottom_margin: 30,
            box_opacity: 0.8,
            box_border: 6,
            timeout_secs: 120,
        }
    }
}

/// Build the video filter chain for a captioned GIF.
///
/// The caption is embedded as a single-quoted drawtext argument; the caller
/// must have removed `'`, `:` and `\` already (see
/// `clipgif_models::sanitize_caption`).
pub fn build_gif_filter(caption: &str, spec: &GifSpec) -> String {
    debug_assert!(!caption.contains(['\'', ':', '\\']));

    format!(
        "scale={width}:-2,fps={fps},drawtext=text='{caption}':fontsize={font_size}:fontcolor=white:x=(w-text_w)/2:y=h-th-{bottom_margin}:box=1:boxcolor=black@{box_opacity}:boxborderw={box_border}",
        width = spec.width,
        fps = spec.fps,
        caption = caption,
        font_size = spec.font_size,
        bottom_margin = spec.bottom_margin,
        box_opacity = spec.box_opacity,
        box_border = spec.box_border,
    )
}

/// Render a validated clip from `input` to a looping GIF at `output`.
pub async fn render_gif(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    clip: &ValidatedClip,
    spec: &GifSpec,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }

    info!(
        "Rendering GIF: {} -> {} ({:.2}s-{:.2}s, caption: {:?})",
        input.display(),
        output.display(),
        clip.start,
        clip.end,
        clip.caption
    );

    counter!("gif_renders_total").increment(1);

    let cmd = FfmpegCommand::new(input, output)
        .seek(clip.start)
        .duration(clip.duration())
        .video_filter(build_gif_filter(&clip.caption, spec))
        .no_audio()
        .loop_count(0)
        .format("gif");

    FfmpegRunner::new()
        .with_timeout(spec.timeout_secs)
        .run(&cmd)
        .await?;

    info!("GIF rendered: {}", output.display());
    Ok(())
}
