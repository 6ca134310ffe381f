//! Media ingest handlers: direct upload and URL download.

use std::path::Path;

use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use clipgif_models::MediaId;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// File extensions accepted for direct upload (MP4 and QuickTime only).
const ALLOWED_EXTENSIONS: &[&str] = &["mp4", "mov"];

/// Response for a completed ingest.
#[derive(Serialize)]
pub struct IngestResponse {
    pub media_id: MediaId,
    pub transcript: String,
    pub segments: usize,
}

/// Upload a video file, extract its audio and transcribe it.
///
/// Expects a multipart form with a `video` field. The transcript is
/// persisted keyed by the returned `media_id` for later clip generation.
pub async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<IngestResponse>> {
    let mut payload: Option<(String, axum::body::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("video") {
            continue;
        }
        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .ok_or_else(|| ApiError::bad_request("Missing filename on video field"))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;
        payload = Some((filename, bytes));
        break;
    }

    let (filename, bytes) =
        payload.ok_or_else(|| ApiError::bad_request("No video file uploaded"))?;

    let ext = validate_extension(&filename)?;

    if bytes.is_empty() {
        return Err(ApiError::bad_request("Uploaded file is empty"));
    }

    let media_id = MediaId::new();
    let dest = state
        .engine
        .upload_dir
        .join(format!("{}.{}", media_id, ext));

    tokio::fs::create_dir_all(&state.engine.upload_dir)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create upload dir: {}", e)))?;
    tokio::fs::write(&dest, &bytes)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to store upload: {}", e)))?;

    info!(%media_id, size = bytes.len(), "Stored upload: {}", dest.display());

    let outcome = state.ingestor.ingest_file(&media_id, &dest).await?;

    Ok(Json(IngestResponse {
        media_id: outcome.media_id,
        transcript: outcome.transcript_text,
        segments: outcome.segment_count,
    }))
}

/// Check the uploaded filename against the accepted formats and return
/// its lowercased extension.
fn validate_extension(filename: &str) -> Result<String, ApiError> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| ApiError::bad_request("Uploaded filename has no extension"))?;

    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(ApiError::bad_request(format!(
            "Unsupported video format: .{}",
            ext
        )));
    }

    Ok(ext)
}

/// Request to ingest a video by URL.
#[derive(Deserialize)]
pub struct IngestUrlRequest {
    pub url: String,
}

/// Download a video from a URL and transcribe it.
pub async fn ingest_url(
    State(state): State<AppState>,
    Json(req): Json<IngestUrlRequest>,
) -> ApiResult<Json<IngestResponse>> {
    let url = req.url.trim();
    if url.is_empty() {
        return Err(ApiError::bad_request("URL must not be empty"));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ApiError::bad_request("URL must be http or https"));
    }

    info!("Ingesting video from URL");

    let outcome = state.ingestor.ingest_url(url).await?;

    Ok(Json(IngestResponse {
        media_id: outcome.media_id,
        transcript: outcome.transcript_text,
        segments: outcome.segment_count,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_mp4_and_quicktime_accepted() {
        assert_eq!(validate_extension("clip.mp4").unwrap(), "mp4");
        assert_eq!(validate_extension("clip.mov").unwrap(), "mov");
        assert_eq!(validate_extension("CLIP.MP4").unwrap(), "mp4");
    }

    #[test]
    fn test_other_video_formats_rejected_with_400() {
        for name in ["clip.webm", "clip.mkv", "clip.avi", "clip.gif"] {
            let err = validate_extension(name).unwrap_err();
            assert!(matches!(err, ApiError::BadRequest(_)), "{} accepted", name);
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_missing_extension_rejected() {
        let err = validate_extension("clip").unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
