//! Per-candidate validation.

use tracing::warn;

use clipgif_models::{ClipCandidate, ValidatedClip};

/// Filter candidates against temporal and structural invariants.
///
/// Candidates are checked in order; invalid entries (missing or non-finite
/// bounds, `end <= start`) are logged and excluded. A single malformed
/// entry never aborts the batch. Relative order is preserved, with no
/// deduplication.
pub fn filter_candidates(candidates: &[ClipCandidate]) -> Vec<ValidatedClip> {
    let mut validated = Vec::with_capacity(candidates.len());

    for (index, candidate) in candidates.iter().enumerate() {
        match candidate.validate() {
            Some(clip) => validated.push(clip),
            None => {
                warn!(index, candidate = ?candidate, "Skipping invalid clip candidate");
            }
        }
    }

    validated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(start: f64, end: f64, text: &str) -> ClipCandidate {
        ClipCandidate {
            start: Some(start),
            end: Some(end),
            text: Some(text.to_string()),
        }
    }

    #[test]
    fn test_inverted_range_excluded_rest_kept() {
        let candidates = vec![candidate(5.0, 3.0, "x"), candidate(1.0, 4.0, "y")];
        let validated = filter_candidates(&candidates);

        assert_eq!(validated.len(), 1);
        assert_eq!(validated[0].caption, "y");
    }

    #[test]
    fn test_missing_bounds_excluded() {
        let candidates = vec![
            ClipCandidate::default(),
            ClipCandidate {
                start: Some(1.0),
                end: None,
                text: None,
            },
            candidate(0.0, 2.0, "kept"),
        ];

        let validated = filter_candidates(&candidates);
        assert_eq!(validated.len(), 1);
        assert_eq!(validated[0].caption, "kept");
    }

    #[test]
    fn test_order_preserved_no_dedup() {
        let candidates = vec![
            candidate(1.0, 4.0, "a"),
            candidate(1.0, 4.0, "a"),
            candidate(10.0, 15.0, "b"),
        ];

        let validated = filter_candidates(&candidates);
        let captions: Vec<_> = validated.iter().map(|v| v.caption.as_str()).collect();
        assert_eq!(captions, vec!["a", "a", "b"]);
    }

    #[test]
    fn test_all_finite_positive_ranges_retained() {
        let candidates = vec![candidate(0.5, 0.6, "tiny"), candidate(100.0, 900.0, "long")];
        let validated = filter_candidates(&candidates);
        assert_eq!(validated.len(), 2);
        for clip in &validated {
            assert!(clip.end > clip.start);
        }
    }
}
