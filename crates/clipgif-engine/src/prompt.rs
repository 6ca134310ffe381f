//! Prompt construction for clip selection.

use clipgif_models::Transcript;

/// Build the clip-selection instruction for the language model.
///
/// Contains the full transcript as `"<start>-<end>: <text>"` lines in
/// original order, the user theme, and an explicit output-format contract.
/// The model is an unreliable oracle; the contract only raises the odds of
/// well-formed output, correctness is enforced downstream by the parser and
/// validator.
///
/// Non-empty `theme` is a caller precondition (enforced at the API layer).
pub fn build_clip_prompt(transcript: &Transcript, theme: &str) -> String {
    let mut lines = String::new();
    for segment in transcript.segments() {
        lines.push_str(&format!(
            "{:.2}-{:.2}: {}\n",
            segment.start,
            segment.end,
            segment.text.trim()
        ));
    }

    format!(
        r#"You are given a video transcript with timestamps. Your task is:
- Select clips matching the requested theme
- Return 2-3 clip objects
- Each clip must include start (number), end (number), and text (string)
- Each clip should be 3-8 seconds long
- Return a valid JSON array only, with no markdown fencing: [{{"start":3,"end":8,"text":"..."}}]

Transcript:
{lines}
Theme: "{theme}"
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipgif_models::TranscriptSegment;

    #[test]
    fn test_prompt_contains_transcript_lines_in_order() {
        let transcript = Transcript::new(vec![
            TranscriptSegment::new(0.0, 5.0, "hello world"),
            TranscriptSegment::new(5.0, 9.0, "goodbye"),
        ]);

        let prompt = build_clip_prompt(&transcript, "funny moments");

        let first = prompt.find("0.00-5.00: hello world").unwrap();
        let second = prompt.find("5.00-9.00: goodbye").unwrap();
        assert!(first < second);
        assert!(prompt.contains(r#"Theme: "funny moments""#));
    }

    #[test]
    fn test_prompt_states_format_contract() {
        let prompt = build_clip_prompt(&Transcript::default(), "x");
        assert!(prompt.contains("2-3 clip objects"));
        assert!(prompt.contains("3-8 seconds"));
        assert!(prompt.contains("no markdown fencing"));
        assert!(prompt.contains(r#"[{"start":3,"end":8,"text":"..."}]"#));
    }
}
