//! Pipeline orchestration.
//!
//! Drives one invocation end to end: load transcript, format the prompt,
//! invoke the model, parse, validate, then render candidates sequentially
//! in validated order until three renders have succeeded. Rendering is
//! intentionally serialized: one external transform in flight at a time
//! bounds peak resource usage and makes failure attribution unambiguous.

use std::path::PathBuf;

use metrics::counter;
use tracing::{info, warn};

use clipgif_models::{MediaId, RenderedClip, MAX_CLIPS_PER_BATCH};

use crate::error::EngineResult;
use crate::library::MediaLibrary;
use crate::model::ModelClient;
use crate::parser::parse_model_reply;
use crate::prompt::build_clip_prompt;
use crate::render::ClipRenderer;
use crate::transcript_store::TranscriptStore;
use crate::validate::filter_candidates;

/// The clip-selection and rendering pipeline.
///
/// Generic over its three external seams so tests can substitute fixed
/// fakes for the model endpoint, the media lookup and the renderer.
pub struct ClipPipeline<M, L, R> {
    model: M,
    library: L,
    renderer: R,
    transcripts: TranscriptStore,
    output_dir: PathBuf,
}

impl<M, L, R> ClipPipeline<M, L, R>
where
    M: ModelClient,
    L: MediaLibrary,
    R: ClipRenderer,
{
    pub fn new(
        model: M,
        library: L,
        renderer: R,
        transcripts: TranscriptStore,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            model,
            library,
            renderer,
            transcripts,
            output_dir: output_dir.into(),
        }
    }

    /// Generate up to three captioned clips for a media ID and theme.
    ///
    /// Fatal failures (missing transcript, model transport, malformed or
    /// unrecognized model output) return `Err`. Everything downstream of
    /// validation is per-item: invalid candidates and failed renders are
    /// skipped, and an invocation where nothing was usable returns
    /// `Ok(vec![])` so the caller can distinguish "no usable clips" from a
    /// broken system.
    pub async fn generate(&self, media_id: &MediaId, theme: &str) -> EngineResult<Vec<RenderedClip>> {
        let transcript = self.transcripts.load(media_id).await?;

        let prompt = build_clip_prompt(&transcript, theme);
        info!(%media_id, theme, "Sending clip-selection prompt to model");
        counter!("model_invocations_total").increment(1);

        let raw_reply = self.model.invoke(&prompt).await?;
        let candidates = parse_model_reply(&raw_reply)?;
        info!(%media_id, count = candidates.len(), "Received clip suggestions");

        let validated = filter_candidates(&candidates);
        if validated.is_empty() {
            info!(%media_id, "No usable clip candidates after validation");
            return Ok(Vec::new());
        }

        let source = self.library.resolve_source(media_id).await?;
        tokio::fs::create_dir_all(&self.output_dir).await?;

        // Attempts and successes are different counters: the cap counts
        // successes, and a failed render does not consume a slot.
        let mut rendered = Vec::new();
        let mut attempts = 0usize;

        for clip in &validated {
            if rendered.len() == MAX_CLIPS_PER_BATCH {
                break;
            }
            attempts += 1;

            let filename = format!("{}_clip_{}.gif", media_id, rendered.len() + 1);
            let dest = self.output_dir.join(&filename);

            counter!("clip_renders_attempted_total").increment(1);
            match self.renderer.render(&source, &dest, clip).await {
                Ok(()) => {
                    counter!("clip_renders_succeeded_total").increment(1);
                    info!(%media_id, filename, "Clip rendered");
                    rendered.push(RenderedClip::new(filename));
                }
                Err(e) => {
                    counter!("clip_renders_failed_total").increment(1);
                    warn!(%media_id, attempt = attempts, error = %e, "Clip render failed, skipping candidate");
                }
            }
        }

        info!(
            %media_id,
            attempts,
            successes = rendered.len(),
            "Clip rendering finished"
        );
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use clipgif_models::{Transcript, TranscriptSegment, ValidatedClip};

    use crate::error::EngineError;

    struct FakeModel {
        reply: String,
    }

    #[async_trait]
    impl ModelClient for FakeModel {
        async fn invoke(&self, _prompt: &str) -> EngineResult<String> {
            Ok(self.reply.clone())
        }
    }

    struct FailingModel;

    #[async_trait]
    impl ModelClient for FailingModel {
        async fn invoke(&self, _prompt: &str) -> EngineResult<String> {
            Err(EngineError::model_transport("connection refused"))
        }
    }

    struct FakeLibrary {
        source: PathBuf,
    }

    #[async_trait]
    impl MediaLibrary for FakeLibrary {
        async fn resolve_source(&self, _media_id: &MediaId) -> EngineResult<PathBuf> {
            Ok(self.source.clone())
        }
    }

    /// Renderer that follows a script of per-call outcomes (true = success)
    /// and records every clip it was asked to render.
    #[derive(Default)]
    struct ScriptedRenderer {
        outcomes: Mutex<Vec<bool>>,
        calls: Mutex<Vec<(PathBuf, ValidatedClip)>>,
    }

    impl ScriptedRenderer {
        fn with_outcomes(outcomes: Vec<bool>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(PathBuf, ValidatedClip)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ClipRenderer for ScriptedRenderer {
        async fn render(
            &self,
            _source: &Path,
            dest: &Path,
            clip: &ValidatedClip,
        ) -> EngineResult<()> {
            self.calls
                .lock()
                .unwrap()
                .push((dest.to_path_buf(), clip.clone()));

            let mut outcomes = self.outcomes.lock().unwrap();
            let ok = if outcomes.is_empty() {
                true
            } else {
                outcomes.remove(0)
            };

            if ok {
                Ok(())
            } else {
                Err(EngineError::Media(clipgif_media::MediaError::ffmpeg_failed(
                    "scripted failure",
                    None,
                    Some(1),
                )))
            }
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        media_id: MediaId,
        transcripts: TranscriptStore,
        output_dir: PathBuf,
        source: PathBuf,
    }

    async fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let transcripts = TranscriptStore::new(dir.path().join("audio"));
        let media_id = MediaId::from("testmedia");

        let transcript = Transcript::new(vec![
            TranscriptSegment::new(0.0, 5.0, "hello world"),
            TranscriptSegment::new(5.0, 9.0, "goodbye"),
        ]);
        transcripts.save(&media_id, &transcript).await.unwrap();

        let source = dir.path().join("testmedia.mp4");
        tokio::fs::write(&source, b"stub").await.unwrap();

        Fixture {
            output_dir: dir.path().join("output"),
            _dir: dir,
            media_id,
            transcripts,
            source,
        }
    }

    fn pipeline(
        fx: &Fixture,
        reply: &str,
        renderer: Arc<ScriptedRenderer>,
    ) -> ClipPipeline<FakeModel, FakeLibrary, Arc<ScriptedRenderer>> {
        ClipPipeline::new(
            FakeModel {
                reply: reply.to_string(),
            },
            FakeLibrary {
                source: fx.source.clone(),
            },
            renderer,
            fx.transcripts.clone(),
            fx.output_dir.clone(),
        )
    }

    // Scenario A: one well-formed candidate; caption is sanitized.
    #[tokio::test]
    async fn test_single_candidate_rendered_with_sanitized_caption() {
        let fx = fixture().await;
        let renderer = Arc::new(ScriptedRenderer::default());
        let pipeline = pipeline(&fx, r#"[{"start":1,"end":4,"text":"hi ':there"}]"#, renderer.clone());

        let rendered = pipeline.generate(&fx.media_id, "greetings").await.unwrap();

        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].filename, "testmedia_clip_1.gif");
        assert_eq!(rendered[0].url, "/output/testmedia_clip_1.gif");

        let calls = renderer.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1.caption, "hi there");
    }

    // Scenario B: unparseable reply fails the invocation before any render.
    #[tokio::test]
    async fn test_malformed_reply_is_fatal_and_renders_nothing() {
        let fx = fixture().await;
        let renderer = Arc::new(ScriptedRenderer::default());
        let pipeline = pipeline(&fx, "not json at all", renderer.clone());

        let err = pipeline.generate(&fx.media_id, "x").await.unwrap_err();
        assert!(matches!(err, EngineError::MalformedModelOutput { .. }));
        assert!(renderer.calls().is_empty());
    }

    // Scenario C: invalid candidate excluded, remaining one rendered.
    #[tokio::test]
    async fn test_invalid_candidate_excluded_rest_rendered() {
        let fx = fixture().await;
        let renderer = Arc::new(ScriptedRenderer::default());
        let pipeline = pipeline(
            &fx,
            r#"[{"start":5,"end":3,"text":"x"},{"start":1,"end":4,"text":"y"}]"#,
            renderer.clone(),
        );

        let rendered = pipeline.generate(&fx.media_id, "x").await.unwrap();

        assert_eq!(rendered.len(), 1);
        let calls = renderer.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1.caption, "y");
        assert!((calls[0].1.start - 1.0).abs() < f64::EPSILON);
    }

    // Scenario D: fenced reply behaves like the unfenced equivalent.
    #[tokio::test]
    async fn test_fenced_reply_renders() {
        let fx = fixture().await;
        let renderer = Arc::new(ScriptedRenderer::default());
        let pipeline = pipeline(
            &fx,
            "```json\n[{\"start\":2,\"end\":6,\"text\":\"z\"}]\n```",
            renderer.clone(),
        );

        let rendered = pipeline.generate(&fx.media_id, "x").await.unwrap();
        assert_eq!(rendered.len(), 1);
        assert_eq!(renderer.calls()[0].1.caption, "z");
    }

    #[tokio::test]
    async fn test_cap_stops_after_three_successes() {
        let fx = fixture().await;
        let renderer = Arc::new(ScriptedRenderer::default());
        let pipeline = pipeline(
            &fx,
            r#"[
                {"start":0,"end":3,"text":"a"},
                {"start":1,"end":4,"text":"b"},
                {"start":2,"end":5,"text":"c"},
                {"start":3,"end":6,"text":"d"},
                {"start":4,"end":7,"text":"e"}
            ]"#,
            renderer.clone(),
        );

        let rendered = pipeline.generate(&fx.media_id, "x").await.unwrap();

        assert_eq!(rendered.len(), 3);
        // The 4th and 5th valid candidates must never reach the renderer
        assert_eq!(renderer.calls().len(), 3);
        let filenames: Vec<_> = rendered.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(
            filenames,
            vec![
                "testmedia_clip_1.gif",
                "testmedia_clip_2.gif",
                "testmedia_clip_3.gif"
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_render_does_not_consume_a_slot() {
        let fx = fixture().await;
        let renderer = Arc::new(ScriptedRenderer::with_outcomes(vec![false, true, true, true]));
        let pipeline = pipeline(
            &fx,
            r#"[
                {"start":0,"end":3,"text":"a"},
                {"start":1,"end":4,"text":"b"},
                {"start":2,"end":5,"text":"c"},
                {"start":3,"end":6,"text":"d"}
            ]"#,
            renderer.clone(),
        );

        let rendered = pipeline.generate(&fx.media_id, "x").await.unwrap();

        // First render fails and is skipped; the next three succeed
        assert_eq!(rendered.len(), 3);
        assert_eq!(renderer.calls().len(), 4);
        assert_eq!(rendered[0].filename, "testmedia_clip_1.gif");
        assert_eq!(renderer.calls()[1].1.caption, "b");
    }

    #[tokio::test]
    async fn test_all_renders_failing_is_empty_success() {
        let fx = fixture().await;
        let renderer = Arc::new(ScriptedRenderer::with_outcomes(vec![false, false]));
        let pipeline = pipeline(
            &fx,
            r#"[{"start":0,"end":3,"text":"a"},{"start":1,"end":4,"text":"b"}]"#,
            renderer.clone(),
        );

        let rendered = pipeline.generate(&fx.media_id, "x").await.unwrap();
        assert!(rendered.is_empty());
        assert_eq!(renderer.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_zero_validated_candidates_skips_renderer() {
        let fx = fixture().await;
        let renderer = Arc::new(ScriptedRenderer::default());
        let pipeline = pipeline(&fx, r#"[{"start":5,"end":3,"text":"x"}]"#, renderer.clone());

        let rendered = pipeline.generate(&fx.media_id, "x").await.unwrap();
        assert!(rendered.is_empty());
        assert!(renderer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_model_transport_failure_is_fatal() {
        let fx = fixture().await;
        let renderer = Arc::new(ScriptedRenderer::default());
        let pipeline = ClipPipeline::new(
            FailingModel,
            FakeLibrary {
                source: fx.source.clone(),
            },
            renderer.clone(),
            fx.transcripts.clone(),
            fx.output_dir.clone(),
        );

        let err = pipeline.generate(&fx.media_id, "x").await.unwrap_err();
        assert!(matches!(err, EngineError::ModelTransport(_)));
        assert!(renderer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_transcript_is_fatal() {
        let fx = fixture().await;
        let renderer = Arc::new(ScriptedRenderer::default());
        let pipeline = pipeline(&fx, "[]", renderer);

        let err = pipeline
            .generate(&MediaId::from("neveringested"), "x")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::TranscriptMissing(_)));
    }
}
