//! Clip generation and listing handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use clipgif_engine::clip_filename_prefix;
use clipgif_models::{MediaId, RenderedClip};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Request to generate clips for a stored transcript.
#[derive(Deserialize)]
pub struct GenerateClipRequest {
    pub media_id: MediaId,
    pub theme: String,
}

/// Successful generation response.
#[derive(Serialize)]
pub struct GifsResponse {
    pub gifs: Vec<RenderedClip>,
}

/// Generate captioned GIF clips matching a theme.
///
/// Runs the full selection pipeline synchronously; an empty `gifs` array
/// means the model proposed nothing usable, not an error.
pub async fn generate_clip(
    State(state): State<AppState>,
    Json(req): Json<GenerateClipRequest>,
) -> ApiResult<Json<GifsResponse>> {
    let theme = req.theme.trim();
    if theme.is_empty() {
        return Err(ApiError::bad_request("Theme must not be empty"));
    }
    if !req.media_id.is_path_safe() {
        return Err(ApiError::bad_request("Invalid media ID"));
    }

    info!(media_id = %req.media_id, theme, "Generating clips");

    let gifs = state.pipeline.generate(&req.media_id, theme).await?;

    info!(media_id = %req.media_id, count = gifs.len(), "Clip generation finished");

    Ok(Json(GifsResponse { gifs }))
}

/// List rendered GIFs for a media ID.
pub async fn list_gifs(
    State(state): State<AppState>,
    Path(media_id): Path<MediaId>,
) -> ApiResult<Json<GifsResponse>> {
    if !media_id.is_path_safe() {
        return Err(ApiError::bad_request("Invalid media ID"));
    }

    let prefix = clip_filename_prefix(&media_id);
    let mut gifs = Vec::new();

    let mut entries = match tokio::fs::read_dir(&state.engine.output_dir).await {
        Ok(entries) => entries,
        // No output dir yet means nothing rendered yet
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Json(GifsResponse { gifs }));
        }
        Err(e) => {
            return Err(ApiError::internal(format!(
                "Failed to read output dir: {}",
                e
            )))
        }
    };

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to read output dir: {}", e)))?
    {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with(&prefix) && name.ends_with(".gif") {
            gifs.push(RenderedClip::new(name.to_string()));
        }
    }

    gifs.sort_by(|a, b| a.filename.cmp(&b.filename));

    Ok(Json(GifsResponse { gifs }))
}
