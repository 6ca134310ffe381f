//! Source video download using yt-dlp.

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{info, warn};

use crate::error::{MediaError, MediaResult};

/// Download a video to `{dest_dir}/{stem}.<ext>` and return the produced path.
///
/// The container format is constrained to mp4 so the downstream clip
/// renderer always sees a format it can seek. The actual extension is
/// taken from the file yt-dlp produced.
pub async fn download_video(url: &str, dest_dir: &Path, stem: &str) -> MediaResult<PathBuf> {
    which::which("yt-dlp").map_err(|_| MediaError::YtDlpNotFound)?;

    tokio::fs::create_dir_all(dest_dir).await?;

    let output_template = dest_dir.join(format!("{}.%(ext)s", stem));
    let output_template = output_template.to_string_lossy().to_string();

    info!("Downloading {} with yt-dlp", url);

    let output = Command::new("yt-dlp")
        .args([
            "--no-playlist",
            "-f",
            "bv*[ext=mp4]+ba[ext=m4a]/b[ext=mp4]/b",
            "--merge-output-format",
            "mp4",
            "--output",
            &output_template,
            url,
        ])
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!("yt-dlp failed: {}", stderr.trim());
        return Err(MediaError::download_failed(format!(
            "yt-dlp exited with {:?}: {}",
            output.status.code(),
            stderr.trim()
        )));
    }

    // yt-dlp decides the final extension; locate the file it produced
    let mut entries = tokio::fs::read_dir(dest_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let matches_stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s == stem)
            .unwrap_or(false);
        if matches_stem && path.is_file() {
            info!("Downloaded video: {}", path.display());
            return Ok(path);
        }
    }

    Err(MediaError::download_failed(
        "yt-dlp reported success but no output file was found",
    ))
}
