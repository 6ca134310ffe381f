//! Timestamped transcript models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors when reading a persisted transcript map.
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("Invalid time-range key: {0}")]
    InvalidKey(String),

    #[error("Transcript value for {0} is not a string")]
    InvalidValue(String),
}

/// One time-aligned segment of speech.
///
/// `start < end` holds for every segment produced by transcription;
/// segments need not be contiguous or non-overlapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Spoken text for this span
    pub text: String,
}

impl TranscriptSegment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Check the segment invariant.
    pub fn is_well_formed(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.start < self.end
    }

    /// Persisted map key for this segment (`"<start>-<end>"`, two decimals).
    pub fn time_key(&self) -> String {
        format!("{:.2}-{:.2}", self.start, self.end)
    }
}

/// An ordered transcript for one piece of media.
///
/// Immutable after transcription; the ordering is established upstream and
/// equals enumeration order of the persisted map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    segments: Vec<TranscriptSegment>,
}

impl Transcript {
    /// Create a transcript from ordered segments.
    pub fn new(segments: Vec<TranscriptSegment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[TranscriptSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Full spoken text, segments joined with single spaces.
    pub fn full_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Convert to the persisted map representation
    /// (`{"<start>-<end>": text}`, two-decimal keys, document order).
    pub fn to_map(&self) -> Map<String, Value> {
        self.segments
            .iter()
            .map(|s| (s.time_key(), Value::String(s.text.clone())))
            .collect()
    }

    /// Parse the persisted map representation.
    ///
    /// Enumeration order of the map defines segment order; callers
    /// guarantee upstream that this equals chronological order.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, TranscriptError> {
        let mut segments = Vec::with_capacity(map.len());
        for (key, value) in map {
            let (start, end) = parse_time_key(key)?;
            let text = value
                .as_str()
                .ok_or_else(|| TranscriptError::InvalidValue(key.clone()))?;
            segments.push(TranscriptSegment::new(start, end, text));
        }
        Ok(Self { segments })
    }
}

/// Parse a `"<start>-<end>"` key into seconds.
fn parse_time_key(key: &str) -> Result<(f64, f64), TranscriptError> {
    let (start, end) = key
        .split_once('-')
        .ok_or_else(|| TranscriptError::InvalidKey(key.to_string()))?;

    let start: f64 = start
        .trim()
        .parse()
        .map_err(|_| TranscriptError::InvalidKey(key.to_string()))?;
    let end: f64 = end
        .trim()
        .parse()
        .map_err(|_| TranscriptError::InvalidKey(key.to_string()))?;

    Ok((start, end))
}
