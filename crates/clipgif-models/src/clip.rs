//! Clip candidate, validated clip and rendered artifact models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum rendered clips per pipeline invocation.
pub const MAX_CLIPS_PER_BATCH: usize = 3;

/// Maximum caption length after sanitization (characters).
pub const CAPTION_MAX_CHARS: usize = 50;

/// Sanitize caption text for embedding in a rendering command.
///
/// Removes `'`, `:` and `\` (each would break the single-quoted drawtext
/// argument) and truncates to [`CAPTION_MAX_CHARS`] characters. Idempotent:
/// sanitizing an already-sanitized caption is a no-op.
pub fn sanitize_caption(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\'' | ':' | '\\'))
        .take(CAPTION_MAX_CHARS)
        .collect()
}

/// An unvalidated clip span proposed by the language model.
///
/// This is the validation boundary: nothing is guaranteed about the
/// fields. Construction from arbitrary JSON is lenient so that a single
/// malformed entry never aborts a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipCandidate {
    /// Proposed start time in seconds, if the model supplied a number
    pub start: Option<f64>,
    /// Proposed end time in seconds, if the model supplied a number
    pub end: Option<f64>,
    /// Proposed caption text, if the model supplied a string
    pub text: Option<String>,
}

impl ClipCandidate {
    /// Build a candidate from any JSON value.
    ///
    /// Non-object values and wrong-typed fields yield `None` fields and are
    /// rejected later by validation rather than failing the whole reply.
    pub fn from_value(value: &Value) -> Self {
        Self {
            start: value.get("start").and_then(Value::as_f64),
            end: value.get("end").and_then(Value::as_f64),
            text: value
                .get("text")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }

    /// Validate temporal and structural invariants.
    ///
    /// Returns `None` when start/end are missing, non-finite, or
    /// `end <= start`. Otherwise derives the sanitized caption (empty text
    /// defaults to an empty caption) and produces a [`ValidatedClip`].
    pub fn validate(&self) -> Option<ValidatedClip> {
        let start = self.start?;
        let end = self.end?;

        if !start.is_finite() || !end.is_finite() || end <= start {
            return None;
        }

        Some(ValidatedClip {
            start,
            end,
            caption: sanitize_caption(self.text.as_deref().unwrap_or("")),
        })
    }
}

/// A candidate that passed temporal and structural checks.
///
/// Consumed exactly once by the renderer. `end > start`, both finite; the
/// caption contains no `'`, `:` or `\` and is at most
/// [`CAPTION_MAX_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedClip {
    pub start: f64,
    pub end: f64,
    pub caption: String,
}

impl ValidatedClip {
    /// Clip duration in seconds. Always positive.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// A rendered artifact on durable storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedClip {
    /// Artifact filename (`{media_id}_clip_{n}.gif`)
    pub filename: String,
    /// Path the static file server resolves directly to the artifact
    pub url: String,
}

impl RenderedClip {
    /// Create a descriptor for an artifact under the `/output` static root.
    pub fn new(filename: impl Into<String>) -> Self {
        let filename = filename.into();
        let url = format!("/output/{}", filename);
        Self { filename, url }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_strips_disallowed_chars() {
        assert_eq!(sanitize_caption("hi ':there"), "hi there");
        assert_eq!(sanitize_caption(r"a\b:c'd"), "abcd");
        assert_eq!(sanitize_caption("clean text"), "clean text");
    }

    #[test]
    fn test_sanitize_truncates() {
        let long = "x".repeat(80);
        assert_eq!(sanitize_caption(&long).chars().count(), CAPTION_MAX_CHARS);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let once = sanitize_caption("some 'text: with\\ stuff and a long tail over fifty characters total");
        let twice = sanitize_caption(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_candidate_from_value_lenient() {
        let c = ClipCandidate::from_value(&json!({"start": 1, "end": 4.5, "text": "ok"}));
        assert_eq!(c.start, Some(1.0));
        assert_eq!(c.end, Some(4.5));
        assert_eq!(c.text.as_deref(), Some("ok"));

        // Wrong types become None instead of failing
        let c = ClipCandidate::from_value(&json!({"start": "3", "end": true}));
        assert_eq!(c.start, None);
        assert_eq!(c.end, None);
        assert_eq!(c.text, None);

        // Non-object values yield an empty candidate
        let c = ClipCandidate::from_value(&json!("just a string"));
        assert_eq!(c, ClipCandidate::default());
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let c = ClipCandidate {
            start: Some(5.0),
            end: Some(3.0),
            text: Some("x".into()),
        };
        assert!(c.validate().is_none());

        let c = ClipCandidate {
            start: Some(3.0),
            end: Some(3.0),
            text: None,
        };
        assert!(c.validate().is_none());
    }

    #[test]
    fn test_validate_accepts_and_sanitizes() {
        let c = ClipCandidate {
            start: Some(1.0),
            end: Some(4.0),
            text: Some("hi ':there".into()),
        };
        let v = c.validate().unwrap();
        assert_eq!(v.caption, "hi there");
        assert!((v.duration() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_missing_text_defaults_empty() {
        let c = ClipCandidate {
            start: Some(0.0),
            end: Some(2.0),
            text: None,
        };
        assert_eq!(c.validate().unwrap().caption, "");
    }

    #[test]
    fn test_rendered_clip_url() {
        let r = RenderedClip::new("abc_clip_1.gif");
        assert_eq!(r.url, "/output/abc_clip_1.gif");
    }
}
