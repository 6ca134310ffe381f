//! Model reply parsing and shape normalization.
//!
//! The model's adherence to the requested schema is unreliable in
//! practice: replies arrive fenced, wrapped in objects, or malformed.
//! This module is permissive about *shape* while staying strict about
//! *fields* — field-level checks happen in the validator.

use serde_json::Value;
use tracing::warn;

use clipgif_models::ClipCandidate;

use crate::error::{EngineError, EngineResult};

/// Recognized top-level shapes of a model reply.
enum ReplyShape {
    /// `[...]` — the requested schema
    Array(Vec<Value>),
    /// `{"clips": [...]}` — common wrapper the model invents
    ClipsObject(Vec<Value>),
    /// Any other non-null object; its values in enumeration order.
    /// Permissive by design and a known source of malformed-candidate
    /// noise, filtered by the per-item validator.
    BareObject(Vec<Value>),
}

/// Parse a raw model reply into ordered clip candidates.
///
/// Strips code fences, parses JSON (failure is fatal:
/// [`EngineError::MalformedModelOutput`]), then normalizes the top-level
/// shape. Valid JSON of an unusable shape (null, string, number, bool) is
/// [`EngineError::UnrecognizedModelFormat`]. Order is preserved.
pub fn parse_model_reply(raw: &str) -> EngineResult<Vec<ClipCandidate>> {
    let text = strip_code_fences(raw);

    let value: Value = serde_json::from_str(text)
        .map_err(|e| EngineError::malformed_output(e.to_string(), raw))?;

    let items = match classify(value)? {
        ReplyShape::Array(items) => items,
        ReplyShape::ClipsObject(items) => items,
        ReplyShape::BareObject(items) => {
            warn!(
                count = items.len(),
                "Model reply was a generic object; using its values as candidates"
            );
            items
        }
    };

    Ok(items.iter().map(ClipCandidate::from_value).collect())
}

/// Remove a wrapping markdown code fence, if present.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

fn classify(value: Value) -> EngineResult<ReplyShape> {
    match value {
        Value::Array(items) => Ok(ReplyShape::Array(items)),
        Value::Object(mut map) => {
            // A non-array "clips" value stays in the map and is treated
            // like any other value of a generic object
            if matches!(map.get("clips"), Some(Value::Array(_))) {
                if let Some(Value::Array(clips)) = map.remove("clips") {
                    return Ok(ReplyShape::ClipsObject(clips));
                }
            }
            Ok(ReplyShape::BareObject(map.into_iter().map(|(_, v)| v).collect()))
        }
        other => Err(EngineError::UnrecognizedModelFormat(format!(
            "expected an array or object, got {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
