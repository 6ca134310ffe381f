//! Renderer seam.

use std::path::Path;

use async_trait::async_trait;

use clipgif_media::{render_gif, GifSpec};
use clipgif_models::ValidatedClip;

use crate::error::EngineResult;

/// Renders one validated clip from a source video to an artifact path.
///
/// Renders run one at a time (the underlying transform is a single
/// external process); the orchestrator isolates each outcome.
#[async_trait]
pub trait ClipRenderer: Send + Sync {
    async fn render(&self, source: &Path, dest: &Path, clip: &ValidatedClip) -> EngineResult<()>;
}

#[async_trait]
impl<T: ClipRenderer + ?Sized> ClipRenderer for std::sync::Arc<T> {
    async fn render(&self, source: &Path, dest: &Path, clip: &ValidatedClip) -> EngineResult<()> {
        (**self).render(source, dest, clip).await
    }
}

/// Production renderer producing captioned looping GIFs via FFmpeg.
#[derive(Debug, Clone, Default)]
pub struct GifRenderer {
    spec: GifSpec,
}

impl GifRenderer {
    pub fn new(spec: GifSpec) -> Self {
        Self { spec }
    }
}

#[async_trait]
impl ClipRenderer for GifRenderer {
    async fn render(&self, source: &Path, dest: &Path, clip: &ValidatedClip) -> EngineResult<()> {
        render_gif(source, dest, clip, &self.spec).await?;
        Ok(())
    }
}
